// src/extractor/mod.rs

mod ytdlp;

#[cfg(any(test, feature = "testing"))]
pub mod fake;

pub use ytdlp::YtDlpExtractor;

use crate::{
    config::DownloadConfig,
    error::AppResult,
    models::{MediaInfo, ProgressCallback},
};
use async_trait::async_trait;

/// Seam to the external extraction tool. Implementations resolve a
/// video-hosting URL into metadata and downloaded files; everything above
/// this trait (retry policy, queueing, archiving) is tool-agnostic.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Fetches metadata without downloading. Single attempt, read-only.
    async fn fetch_info(&self, url: &str, config: &DownloadConfig) -> AppResult<MediaInfo>;

    /// Downloads the URL, forwarding progress ticks to `on_progress` as
    /// they arrive from the tool. Returns the final metadata.
    async fn download(
        &self,
        url: &str,
        config: &DownloadConfig,
        is_playlist: bool,
        on_progress: Option<ProgressCallback>,
    ) -> AppResult<MediaInfo>;
}
