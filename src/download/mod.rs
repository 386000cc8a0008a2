// src/download/mod.rs

mod archive;
mod downloader;
mod item;
mod queue;

pub use archive::{ArchiveEntry, DownloadArchive};
pub use downloader::Downloader;
pub use item::DownloadItem;
pub use queue::{DownloadQueue, QueueProgressCallback};

use crate::{symbols, ui};
use colored::*;
use log::info;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

#[derive(Clone, Default)]
pub struct DownloadStats {
    pub total: usize,
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Shared batch bookkeeping: counters plus the per-item reasons behind
/// every skip and failure, for the end-of-run report.
#[derive(Clone)]
pub struct DownloadManager {
    stats: Arc<Mutex<DownloadStats>>,
    failed_downloads: Arc<Mutex<Vec<(String, String)>>>,
    skipped_downloads: Arc<Mutex<Vec<(String, String)>>>,
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadManager {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(Mutex::new(DownloadStats::default())),
            failed_downloads: Arc::new(Mutex::new(Vec::new())),
            skipped_downloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn start_batch(&self, total_tasks: usize) {
        info!("starting batch of {} download tasks", total_tasks);
        let mut stats = self.stats.lock().unwrap();
        *stats = DownloadStats {
            total: total_tasks,
            ..Default::default()
        };
        self.failed_downloads.lock().unwrap().clear();
        self.skipped_downloads.lock().unwrap().clear();
    }

    pub fn record_success(&self) {
        self.stats.lock().unwrap().success += 1;
    }

    pub fn record_skip(&self, label: &str, reason: &str) {
        info!("skipping '{}': {}", label, reason);
        self.stats.lock().unwrap().skipped += 1;
        self.skipped_downloads
            .lock()
            .unwrap()
            .push((label.to_string(), reason.to_string()));
    }

    pub fn record_failure(&self, label: &str, reason: &str) {
        log::error!("download of '{}' failed: {}", label, reason);
        self.stats.lock().unwrap().failed += 1;
        self.failed_downloads
            .lock()
            .unwrap()
            .push((label.to_string(), reason.to_string()));
    }

    pub fn get_stats(&self) -> DownloadStats {
        self.stats.lock().unwrap().clone()
    }

    pub fn did_all_succeed(&self) -> bool {
        self.stats.lock().unwrap().failed == 0
    }

    pub fn print_report(&self) {
        let stats = self.get_stats();
        let skipped = self.skipped_downloads.lock().unwrap();
        let failed = self.failed_downloads.lock().unwrap();
        info!(
            "batch report: Total={}, Success={}, Skipped={}, Failed={}",
            stats.total, stats.success, stats.skipped, stats.failed
        );

        if !skipped.is_empty() || !failed.is_empty() {
            ui::print_sub_header("Download Details");
            if !skipped.is_empty() {
                println!("\n{} Skipped ({}):", *symbols::SKIP, stats.skipped);
                print_grouped_report(&skipped, |s| s.cyan());
            }
            if !failed.is_empty() {
                println!("\n{} Failed ({}):", *symbols::ERROR, stats.failed);
                print_grouped_report(&failed, |s| s.red());
            }
        }
        ui::print_sub_header("Summary");
        if stats.total > 0 && stats.success == stats.total - stats.skipped {
            println!(
                "{} All {} tasks finished successfully ({} skipped).",
                *symbols::OK,
                stats.total,
                stats.skipped
            );
        } else {
            let summary = format!(
                "{} | {} | {}",
                format!("Success: {}", stats.success).green(),
                format!("Failed: {}", stats.failed).red(),
                format!("Skipped: {}", stats.skipped).yellow()
            );
            println!("{}", summary);
        }
    }
}

fn print_grouped_report(
    items: &[(String, String)],
    color_fn: fn(ColoredString) -> ColoredString,
) {
    let mut grouped: HashMap<&String, Vec<&String>> = HashMap::new();
    for (label, reason) in items {
        grouped.entry(reason).or_default().push(label);
    }
    let mut sorted_reasons: Vec<_> = grouped.keys().collect();
    sorted_reasons.sort();
    for reason in sorted_reasons {
        println!("  - {}", color_fn(format!("Reason: {}", reason).into()));
        let mut labels = grouped.get(reason).unwrap().clone();
        labels.sort();
        for label in labels {
            println!("    - {}", label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_counters() {
        let manager = DownloadManager::new();
        manager.start_batch(4);
        manager.record_success();
        manager.record_success();
        manager.record_skip("Video A", "already in archive");
        manager.record_failure("Video B", "network error");

        let stats = manager.get_stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.success, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failed, 1);
        assert!(!manager.did_all_succeed());
    }

    #[test]
    fn test_start_batch_resets_previous_run() {
        let manager = DownloadManager::new();
        manager.start_batch(1);
        manager.record_failure("Video A", "boom");
        manager.start_batch(2);
        assert!(manager.did_all_succeed());
        assert_eq!(manager.get_stats().total, 2);
    }
}
