// src/download/item.rs

use crate::models::DownloadStatus;
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_status() -> DownloadStatus {
    DownloadStatus::Pending
}

/// One queued download. Status transitions are caller-driven; only the
/// `mark_*` helpers bundle status, timestamp and progress changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadItem {
    pub url: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_status")]
    pub status: DownloadStatus,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
    #[serde(skip)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub retries: u32,
}

impl DownloadItem {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        let url = url.into();
        let now = Utc::now();
        let digest = format!("{:x}", Md5::digest(url.as_bytes()));
        let id = format!("{}_{}", &digest[..12], now.timestamp_millis());
        Self {
            url,
            id,
            title: title.into(),
            status: DownloadStatus::Pending,
            progress: 0.0,
            error: None,
            output_path: None,
            added_at: now,
            started_at: None,
            completed_at: None,
            retries: 0,
        }
    }

    pub fn mark_started(&mut self) {
        self.status = DownloadStatus::Downloading;
        self.started_at = Some(Utc::now());
    }

    pub fn mark_completed(&mut self, output_path: Option<PathBuf>) {
        self.status = DownloadStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.progress = 100.0;
        if output_path.is_some() {
            self.output_path = output_path;
        }
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = DownloadStatus::Failed;
        self.error = Some(error.into());
    }
}
