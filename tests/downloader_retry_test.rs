// tests/downloader_retry_test.rs

use std::sync::Arc;
use ytgrab::{
    config::DownloadConfig,
    download::Downloader,
    error::AppError,
    extractor::fake::FakeExtractor,
};

fn config(retries: u32) -> Arc<DownloadConfig> {
    Arc::new(DownloadConfig {
        retries,
        retry_sleep: 0.0,
        ..Default::default()
    })
}

#[tokio::test]
async fn test_flaky_extractor_recovers_within_budget() {
    let extractor = Arc::new(FakeExtractor::failing(2));
    let downloader = Downloader::new(extractor.clone(), config(2));

    let info = downloader
        .download("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        .await
        .unwrap();
    assert_eq!(info.id, "dQw4w9WgXcQ");
    assert_eq!(extractor.call_count(), 3);
}

#[tokio::test]
async fn test_exhausted_budget_surfaces_attempts_and_cause() {
    let extractor = Arc::new(FakeExtractor::failing(u32::MAX));
    let downloader = Downloader::new(extractor.clone(), config(2));

    let err = downloader
        .download("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        .await
        .unwrap_err();

    assert_eq!(extractor.call_count(), 3, "retries=2 means exactly 3 attempts");
    let message = err.to_string();
    assert!(message.contains("3 attempt"), "got: {message}");
    assert!(message.contains("simulated network error"), "got: {message}");
    assert!(matches!(err, AppError::Download { attempts: 3, .. }));
}

#[tokio::test]
async fn test_metadata_fetch_bypasses_retry_wrapper() {
    let extractor = Arc::new(FakeExtractor::failing(u32::MAX));
    let downloader = Downloader::new(extractor.clone(), config(5));

    let info = downloader
        .get_info("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        .await
        .unwrap();
    assert_eq!(info.title, "Test Video");
    assert_eq!(extractor.call_count(), 0);
}
