// src/extractor/ytdlp.rs

use super::MediaExtractor;
use crate::{
    config::DownloadConfig,
    constants,
    error::{AppError, AppResult},
    models::{MediaInfo, ProgressCallback, ProgressEvent, ProgressStage},
};
use async_trait::async_trait;
use log::{debug, warn};
use regex::Regex;
use std::{
    path::{Path, PathBuf},
    process::Stdio,
    sync::LazyLock,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, BufReader},
    process::Command,
};

// Matches yt-dlp's `--newline` progress output, e.g.
// `[download]  42.3% of 10.00MiB at 1.20MiB/s ETA 00:05`
static PROGRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[download\]\s+(\d+(?:\.\d+)?)%(?:.*?\bat\s+(\S+))?(?:.*?\bETA\s+(\S+))?")
        .unwrap()
});

/// Drives the `yt-dlp` executable as a subprocess and translates its
/// line-oriented output into typed events.
pub struct YtDlpExtractor {
    binary: PathBuf,
}

impl YtDlpExtractor {
    /// Resolves the binary: explicit configured path first, then a few
    /// well-known install locations, then whatever PATH provides.
    pub fn new(configured: Option<&Path>) -> Self {
        let binary = configured
            .map(Path::to_path_buf)
            .or_else(|| {
                constants::YTDLP_PROBE_PATHS
                    .iter()
                    .map(PathBuf::from)
                    .find(|p| p.exists())
            })
            .unwrap_or_else(|| PathBuf::from(constants::YTDLP_BIN));
        debug!("using yt-dlp binary: {:?}", binary);
        Self { binary }
    }

    fn spawn_error(&self, e: std::io::Error) -> AppError {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::ExtractorNotFound(self.binary.to_string_lossy().into_owned())
        } else {
            AppError::Io(e)
        }
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn fetch_info(&self, url: &str, config: &DownloadConfig) -> AppResult<MediaInfo> {
        let mut cmd = Command::new(&self.binary);
        cmd.args([
            "--dump-single-json",
            "--flat-playlist",
            "--no-warnings",
            "--extractor-args",
            "youtube:player_client=android,web",
        ]);
        if let Some(cookies) = &config.cookies_file
            && cookies.exists()
        {
            cmd.arg("--cookies").arg(cookies);
        }
        cmd.arg(url);

        let output = cmd.output().await.map_err(|e| self.spawn_error(e))?;
        if !output.status.success() {
            return Err(AppError::Extractor(stderr_tail(&output.stderr)));
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    async fn download(
        &self,
        url: &str,
        config: &DownloadConfig,
        is_playlist: bool,
        on_progress: Option<ProgressCallback>,
    ) -> AppResult<MediaInfo> {
        let mut args = config.to_args(is_playlist);
        args.push("--print-json".into());
        args.push(url.into());
        debug!("spawning yt-dlp with args: {:?}", args);

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AppError::Extractor("failed to capture yt-dlp stdout".into()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| AppError::Extractor("failed to capture yt-dlp stderr".into()))?;

        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf).await.ok();
            buf
        });

        let mut info: Option<MediaInfo> = None;
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            if line.starts_with('{') {
                // one metadata document per finished download
                match serde_json::from_str::<MediaInfo>(&line) {
                    Ok(parsed) => info = Some(parsed),
                    Err(e) => warn!("unparseable yt-dlp metadata line: {}", e),
                }
                continue;
            }
            if let Some(callback) = &on_progress
                && let Some(event) = parse_output_line(&line)
            {
                callback(event);
            }
        }

        let status = child.wait().await?;
        let stderr_buf = stderr_task.await.unwrap_or_default();
        if !status.success() {
            return Err(AppError::Extractor(stderr_tail(&stderr_buf)));
        }

        if let Some(callback) = &on_progress {
            callback(ProgressEvent {
                stage: ProgressStage::Finished,
                percent: Some(100.0),
                speed: None,
                eta: None,
            });
        }

        // yt-dlp prints no metadata when its own archive skipped the item
        Ok(info.unwrap_or_else(|| MediaInfo {
            id: String::new(),
            title: String::new(),
            extractor: "youtube".into(),
            uploader: None,
            duration: None,
            webpage_url: Some(url.to_string()),
            entries: None,
        }))
    }
}

fn parse_output_line(line: &str) -> Option<ProgressEvent> {
    if let Some(caps) = PROGRESS_RE.captures(line) {
        return Some(ProgressEvent {
            stage: ProgressStage::Downloading,
            percent: caps.get(1).and_then(|m| m.as_str().parse().ok()),
            speed: caps.get(2).map(|m| m.as_str().to_string()),
            eta: caps.get(3).map(|m| m.as_str().to_string()),
        });
    }
    if line.starts_with("[ExtractAudio]") || line.starts_with("[Merger]") {
        return Some(ProgressEvent {
            stage: ProgressStage::Postprocessing,
            percent: None,
            speed: None,
            eta: None,
        });
    }
    None
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        "yt-dlp exited with a non-zero status".to_string()
    } else {
        // keep only the last few lines; yt-dlp stderr can be noisy
        trimmed
            .lines()
            .rev()
            .take(3)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progress_line() {
        let event =
            parse_output_line("[download]  42.3% of 10.00MiB at 1.20MiB/s ETA 00:05").unwrap();
        assert_eq!(event.stage, ProgressStage::Downloading);
        assert_eq!(event.percent, Some(42.3));
        assert_eq!(event.speed.as_deref(), Some("1.20MiB/s"));
        assert_eq!(event.eta.as_deref(), Some("00:05"));
    }

    #[test]
    fn test_parse_progress_line_without_speed() {
        let event = parse_output_line("[download] 100%").unwrap();
        assert_eq!(event.percent, Some(100.0));
        assert_eq!(event.speed, None);
    }

    #[test]
    fn test_non_progress_lines_are_ignored() {
        assert!(parse_output_line("[youtube] abc: Downloading webpage").is_none());
        assert!(parse_output_line("[download] Destination: video.mp4").is_none());
    }

    #[test]
    fn test_postprocessing_lines() {
        let event = parse_output_line("[ExtractAudio] Destination: song.mp3").unwrap();
        assert_eq!(event.stage, ProgressStage::Postprocessing);
    }

    #[test]
    fn test_stderr_tail_keeps_last_lines() {
        let noisy = b"line1\nline2\nline3\nline4\nERROR: boom";
        let tail = stderr_tail(noisy);
        assert!(tail.contains("ERROR: boom"));
        assert!(!tail.contains("line1"));
        assert_eq!(stderr_tail(b""), "yt-dlp exited with a non-zero status");
    }
}
