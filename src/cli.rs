// src/cli.rs

use crate::models::{OutputFormat, VideoResolution};
use clap::{Parser, ValueEnum, crate_version};
use std::path::PathBuf;

/// Log output level for the hidden debug flag.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true,
)]
#[command(group(
    clap::ArgGroup::new("mode")
        .required(true)
        .args(&["interactive", "url", "playlist", "info", "batch_file"]),
))]
pub struct Cli {
    // --- Run modes (Mode) ---
    /// Start an interactive session, entering URLs one by one
    #[arg(short, long, action = clap::ArgAction::SetTrue, help_heading = "Mode")]
    pub interactive: bool,
    /// Download a single video URL
    #[arg(long, help_heading = "Mode")]
    pub url: Option<String>,
    /// Download an entire playlist URL
    #[arg(long, help_heading = "Mode")]
    pub playlist: Option<String>,
    /// Fetch and print metadata for a URL without downloading
    #[arg(long, value_name = "URL", help_heading = "Mode")]
    pub info: Option<String>,
    /// Download multiple URLs from a text file (one per line) through the queue
    #[arg(short, long, value_name = "FILE", help_heading = "Mode")]
    pub batch_file: Option<PathBuf>,

    // --- Download options (Options) ---
    /// Directory to save files into
    #[arg(short, long, value_name = "DIR", default_value_os_t = PathBuf::from(crate::constants::DEFAULT_SAVE_DIR), help_heading = "Options")]
    pub output: PathBuf,
    /// Output container/codec; audio formats imply audio extraction
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Mp4, help_heading = "Options")]
    pub format: OutputFormat,
    /// Cap the video resolution
    #[arg(short = 'q', long, value_enum, default_value_t = VideoResolution::Best, help_heading = "Options")]
    pub resolution: VideoResolution,
    /// Audio bitrate in kbps for audio extraction
    #[arg(long, default_value_t = crate::constants::DEFAULT_AUDIO_QUALITY, help_heading = "Options")]
    pub audio_quality: u32,
    /// Custom output template (yt-dlp syntax), relative to the output dir
    #[arg(long, value_name = "TEMPLATE", help_heading = "Options")]
    pub output_template: Option<String>,
    /// Path to a cookies.txt file for authenticated downloads
    #[arg(short, long, value_name = "FILE", help_heading = "Options")]
    pub cookies: Option<PathBuf>,
    /// Archive file recording finished downloads; archived URLs are skipped
    #[arg(long, value_name = "FILE", help_heading = "Options")]
    pub archive_file: Option<PathBuf>,
    /// Persist queue state to this JSON snapshot (batch mode)
    #[arg(long, value_name = "FILE", help_heading = "Options")]
    pub queue_file: Option<PathBuf>,
    /// Number of retries after a failed download attempt
    #[arg(long, help_heading = "Options")]
    pub retries: Option<u32>,
    /// Seconds to sleep between retry attempts
    #[arg(long, value_name = "SECS", help_heading = "Options")]
    pub retry_sleep: Option<f64>,
    /// Download rate limit, e.g. '500K' or '1M'
    #[arg(long, value_name = "RATE", help_heading = "Options")]
    pub rate_limit: Option<String>,
    /// Save the thumbnail next to the media file
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub write_thumbnail: bool,
    /// Embed the thumbnail into extracted audio files
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub embed_thumbnail: bool,
    /// Write a .info.json file next to the media file
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub write_info_json: bool,
    /// Do not embed chapter markers
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub no_embed_chapters: bool,
    /// Re-download even when the URL is already in the archive
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub force_redownload: bool,

    // --- General options (General) ---
    /// Print this help message and exit
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// Print version information and exit
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (hidden) Log level for the debug log file
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
