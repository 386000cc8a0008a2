// src/models.rs

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

/// Lifecycle state of a queued download. Transitions are caller-driven;
/// only the `mark_*` helpers on `DownloadItem` bundle side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Pending,
    Downloading,
    Paused,
    Completed,
    Failed,
    Cancelled,
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DownloadStatus::Pending => "pending",
            DownloadStatus::Downloading => "downloading",
            DownloadStatus::Paused => "paused",
            DownloadStatus::Completed => "completed",
            DownloadStatus::Failed => "failed",
            DownloadStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Container / codec the finished file should end up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Mp4,
    Webm,
    Mkv,
    Mp3,
    M4a,
    Wav,
    Flac,
    Aac,
    Ogg,
}

impl OutputFormat {
    pub fn is_audio_only(self) -> bool {
        matches!(
            self,
            OutputFormat::Mp3
                | OutputFormat::M4a
                | OutputFormat::Wav
                | OutputFormat::Flac
                | OutputFormat::Aac
                | OutputFormat::Ogg
        )
    }

    /// Codec name understood by yt-dlp's `--audio-format`.
    pub fn audio_codec(self) -> &'static str {
        match self {
            OutputFormat::Mp3 => "mp3",
            OutputFormat::M4a => "m4a",
            OutputFormat::Wav => "wav",
            OutputFormat::Flac => "flac",
            OutputFormat::Aac => "aac",
            OutputFormat::Ogg => "vorbis",
            _ => "mp3",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Mp4 => "mp4",
            OutputFormat::Webm => "webm",
            OutputFormat::Mkv => "mkv",
            OutputFormat::Mp3 => "mp3",
            OutputFormat::M4a => "m4a",
            OutputFormat::Wav => "wav",
            OutputFormat::Flac => "flac",
            OutputFormat::Aac => "aac",
            OutputFormat::Ogg => "ogg",
        }
    }
}

/// Upper bound on the video height. `Best` leaves selection to yt-dlp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum VideoResolution {
    #[value(name = "best")]
    Best,
    #[value(name = "2160p")]
    P2160,
    #[value(name = "1440p")]
    P1440,
    #[value(name = "1080p")]
    P1080,
    #[value(name = "720p")]
    P720,
    #[value(name = "480p")]
    P480,
    #[value(name = "360p")]
    P360,
}

impl VideoResolution {
    pub fn height(self) -> Option<u32> {
        match self {
            VideoResolution::Best => None,
            VideoResolution::P2160 => Some(2160),
            VideoResolution::P1440 => Some(1440),
            VideoResolution::P1080 => Some(1080),
            VideoResolution::P720 => Some(720),
            VideoResolution::P480 => Some(480),
            VideoResolution::P360 => Some(360),
        }
    }
}

fn default_extractor() -> String {
    "youtube".to_string()
}

/// Metadata returned by the extractor for a video or playlist,
/// deserialized from yt-dlp's JSON output.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_extractor")]
    pub extractor: String,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub webpage_url: Option<String>,
    #[serde(default)]
    pub entries: Option<Vec<MediaInfo>>,
}

impl MediaInfo {
    pub fn is_playlist(&self) -> bool {
        self.entries.is_some()
    }

    /// Duration as `M:SS` or `H:MM:SS`.
    pub fn format_duration(&self) -> Option<String> {
        let total = self.duration? as u64;
        let (hours, rem) = (total / 3600, total % 3600);
        let (minutes, seconds) = (rem / 60, rem % 60);
        Some(if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{}:{:02}", minutes, seconds)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
    Downloading,
    Finished,
    Postprocessing,
}

/// One progress tick forwarded unfiltered from the extractor process.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub stage: ProgressStage,
    pub percent: Option<f64>,
    pub speed: Option<String>,
    pub eta: Option<String>,
}

pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;
