// src/extractor/fake.rs

//! Scriptable extractor used by unit and integration tests. Compiled only
//! with the `testing` feature or under `cfg(test)`.

use super::MediaExtractor;
use crate::{
    config::DownloadConfig,
    error::{AppError, AppResult},
    models::{MediaInfo, ProgressCallback, ProgressEvent, ProgressStage},
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};

/// Fails the first `fail_times` download calls, then succeeds. Every call
/// is counted so tests can assert the exact number of attempts.
pub struct FakeExtractor {
    fail_times: u32,
    calls: AtomicU32,
}

impl FakeExtractor {
    pub fn succeeding() -> Self {
        Self::failing(0)
    }

    pub fn failing(fail_times: u32) -> Self {
        Self {
            fail_times,
            calls: AtomicU32::new(0),
        }
    }

    /// Number of `download` calls observed so far.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn stub_info(url: &str) -> MediaInfo {
        MediaInfo {
            id: "dQw4w9WgXcQ".into(),
            title: "Test Video".into(),
            extractor: "youtube".into(),
            uploader: Some("Test Channel".into()),
            duration: Some(212.0),
            webpage_url: Some(url.to_string()),
            entries: None,
        }
    }
}

#[async_trait]
impl MediaExtractor for FakeExtractor {
    async fn fetch_info(&self, url: &str, _config: &DownloadConfig) -> AppResult<MediaInfo> {
        Ok(Self::stub_info(url))
    }

    async fn download(
        &self,
        url: &str,
        _config: &DownloadConfig,
        _is_playlist: bool,
        on_progress: Option<ProgressCallback>,
    ) -> AppResult<MediaInfo> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.fail_times {
            return Err(AppError::Extractor(format!(
                "simulated network error (call {})",
                attempt
            )));
        }
        if let Some(callback) = &on_progress {
            for percent in [0.0, 50.0, 100.0] {
                callback(ProgressEvent {
                    stage: ProgressStage::Downloading,
                    percent: Some(percent),
                    speed: Some("1.00MiB/s".into()),
                    eta: Some("00:01".into()),
                });
            }
            callback(ProgressEvent {
                stage: ProgressStage::Finished,
                percent: Some(100.0),
                speed: None,
                eta: None,
            });
        }
        Ok(Self::stub_info(url))
    }
}
