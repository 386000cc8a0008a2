// src/download/downloader.rs

use crate::{
    config::DownloadConfig,
    error::{AppError, AppResult},
    extractor::MediaExtractor,
    models::{MediaInfo, ProgressCallback},
};
use log::{info, warn};
use std::{sync::Arc, time::Duration};

/// Retry wrapper around a [`MediaExtractor`]. A download gets
/// `config.retries + 1` attempts with `config.retry_sleep` seconds between
/// them; metadata fetches get exactly one.
pub struct Downloader {
    extractor: Arc<dyn MediaExtractor>,
    config: Arc<DownloadConfig>,
    progress_callback: Option<ProgressCallback>,
}

impl Downloader {
    pub fn new(extractor: Arc<dyn MediaExtractor>, config: Arc<DownloadConfig>) -> Self {
        Self {
            extractor,
            config,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Single attempt, no retry: a metadata failure is usually a bad URL
    /// rather than a transient network error.
    pub async fn get_info(&self, url: &str) -> AppResult<MediaInfo> {
        self.extractor.fetch_info(url, &self.config).await
    }

    pub async fn download(&self, url: &str) -> AppResult<MediaInfo> {
        self.run_with_retry(url, false).await
    }

    pub async fn download_playlist(&self, url: &str) -> AppResult<MediaInfo> {
        self.run_with_retry(url, true).await
    }

    async fn run_with_retry(&self, url: &str, is_playlist: bool) -> AppResult<MediaInfo> {
        let total_attempts = self.config.retries + 1;
        let mut last_err: Option<AppError> = None;

        for attempt in 1..=total_attempts {
            info!("download attempt {}/{} for {}", attempt, total_attempts, url);
            match self
                .extractor
                .download(url, &self.config, is_playlist, self.progress_callback.clone())
                .await
            {
                Ok(media_info) => return Ok(media_info),
                Err(e) => {
                    warn!("attempt {}/{} failed: {}", attempt, total_attempts, e);
                    last_err = Some(e);
                    if attempt < total_attempts {
                        tokio::time::sleep(Duration::from_secs_f64(self.config.retry_sleep)).await;
                    }
                }
            }
        }

        Err(AppError::Download {
            attempts: total_attempts,
            source: Box::new(
                last_err.unwrap_or_else(|| AppError::Extractor("no attempts were made".into())),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::fake::FakeExtractor;
    use crate::models::ProgressEvent;
    use std::sync::Mutex;

    fn test_config(retries: u32) -> Arc<DownloadConfig> {
        Arc::new(DownloadConfig {
            retries,
            retry_sleep: 0.0,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_succeeds_on_first_attempt() {
        let extractor = Arc::new(FakeExtractor::succeeding());
        let downloader = Downloader::new(extractor.clone(), test_config(3));

        let info = downloader.download("https://yt/ok").await.unwrap();
        assert_eq!(info.title, "Test Video");
        assert_eq!(extractor.call_count(), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let extractor = Arc::new(FakeExtractor::failing(2));
        let downloader = Downloader::new(extractor.clone(), test_config(3));

        downloader.download("https://yt/flaky").await.unwrap();
        assert_eq!(extractor.call_count(), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_reports_attempt_count() {
        let extractor = Arc::new(FakeExtractor::failing(u32::MAX));
        let downloader = Downloader::new(extractor.clone(), test_config(2));

        let err = downloader.download("https://yt/dead").await.unwrap_err();
        assert_eq!(extractor.call_count(), 3, "retries=2 means exactly 3 attempts");
        match err {
            AppError::Download { attempts, source } => {
                assert_eq!(attempts, 3);
                assert!(source.to_string().contains("simulated network error"));
            }
            other => panic!("expected Download error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_retries_means_single_attempt() {
        let extractor = Arc::new(FakeExtractor::failing(u32::MAX));
        let downloader = Downloader::new(extractor.clone(), test_config(0));

        downloader.download("https://yt/dead").await.unwrap_err();
        assert_eq!(extractor.call_count(), 1);
    }

    #[tokio::test]
    async fn test_get_info_never_retries() {
        let extractor = Arc::new(FakeExtractor::failing(u32::MAX));
        let downloader = Downloader::new(extractor.clone(), test_config(5));

        downloader.get_info("https://yt/meta").await.unwrap();
        assert_eq!(extractor.call_count(), 0, "get_info must not touch download");
    }

    #[tokio::test]
    async fn test_progress_events_forwarded() {
        let extractor = Arc::new(FakeExtractor::succeeding());
        let events: Arc<Mutex<Vec<ProgressEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let downloader = Downloader::new(extractor, test_config(0))
            .with_progress_callback(Arc::new(move |event| {
                sink.lock().unwrap().push(event);
            }));

        downloader.download("https://yt/ok").await.unwrap();
        let seen = events.lock().unwrap();
        assert!(seen.len() >= 2);
        assert_eq!(seen.last().unwrap().percent, Some(100.0));
    }
}
