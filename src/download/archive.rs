// src/download/archive.rs

use crate::error::AppResult;
use chrono::Utc;
use itertools::Itertools;
use log::debug;
use std::{
    collections::HashSet,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// One archive record, serialized as a single `<extractor> <video_id>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub extractor: String,
    pub video_id: String,
}

impl ArchiveEntry {
    pub fn to_line(&self) -> String {
        format!("{} {}", self.extractor, self.video_id)
    }

    /// A bare id without an extractor prefix is treated as a youtube id.
    pub fn from_line(line: &str) -> Self {
        match line.trim().split_once(' ') {
            Some((extractor, video_id)) => Self {
                extractor: extractor.to_string(),
                video_id: video_id.to_string(),
            },
            None => Self {
                extractor: "youtube".to_string(),
                video_id: line.trim().to_string(),
            },
        }
    }
}

/// Ledger of already-fetched (extractor, id) pairs backed by a flat text
/// file. Entries load lazily once and the cache stays in sync with every
/// mutation. A missing file means an empty archive, never an error.
#[derive(Debug)]
pub struct DownloadArchive {
    path: PathBuf,
    entries: Option<HashSet<String>>,
}

impl DownloadArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_entries(&mut self) -> AppResult<&mut HashSet<String>> {
        if self.entries.is_none() {
            let mut set = HashSet::new();
            if self.path.exists() {
                for line in fs::read_to_string(&self.path)?.lines() {
                    let line = line.trim();
                    if !line.is_empty() && !line.starts_with('#') {
                        set.insert(line.to_string());
                    }
                }
            }
            debug!("loaded {} archive entries from {:?}", set.len(), self.path);
            self.entries = Some(set);
        }
        Ok(self.entries.as_mut().unwrap_or_else(|| unreachable!()))
    }

    pub fn contains(&mut self, extractor: &str, video_id: &str) -> AppResult<bool> {
        let key = format!("{} {}", extractor, video_id);
        Ok(self.load_entries()?.contains(&key))
    }

    /// Idempotent append. A title, when given, is written as a `#` comment
    /// line above the entry for human readers only.
    pub fn add(&mut self, extractor: &str, video_id: &str, title: Option<&str>) -> AppResult<()> {
        let entry_line = format!("{} {}", extractor, video_id);
        let entries = self.load_entries()?;
        if entries.contains(&entry_line) {
            return Ok(());
        }
        entries.insert(entry_line.clone());

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        if let Some(title) = title {
            writeln!(file, "# {} - {}", title, Utc::now().to_rfc3339())?;
        }
        writeln!(file, "{}", entry_line)?;
        Ok(())
    }

    /// Returns whether the entry existed. Rewrites the whole file (sorted,
    /// comments dropped) through a temp file in the same directory.
    pub fn remove(&mut self, extractor: &str, video_id: &str) -> AppResult<bool> {
        let entry_line = format!("{} {}", extractor, video_id);
        let entries = self.load_entries()?;
        if !entries.remove(&entry_line) {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    fn save(&mut self) -> AppResult<()> {
        let Some(entries) = &self.entries else {
            return Ok(());
        };
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        for entry in entries.iter().sorted() {
            writeln!(tmp, "{}", entry)?;
        }
        tmp.persist(&self.path)?;
        Ok(())
    }

    pub fn list_entries(&mut self) -> AppResult<Vec<ArchiveEntry>> {
        Ok(self
            .load_entries()?
            .iter()
            .sorted()
            .map(|line| ArchiveEntry::from_line(line))
            .collect())
    }

    /// Drops the cache and deletes the backing file.
    pub fn clear(&mut self) -> AppResult<()> {
        self.entries = Some(HashSet::new());
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn len(&mut self) -> AppResult<usize> {
        Ok(self.load_entries()?.len())
    }

    pub fn is_empty(&mut self) -> AppResult<bool> {
        Ok(self.load_entries()?.is_empty())
    }
}
