// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const TITLE_TRUNCATE_LENGTH: usize = 65;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const DEFAULT_SAVE_DIR: &str = "downloads";
pub const DEFAULT_AUDIO_QUALITY: u32 = 192;
pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_SLEEP: f64 = 5.0;
pub const DEFAULT_MAX_HISTORY: usize = 50;
pub const YTDLP_BIN: &str = "yt-dlp";

/// Output templates handed to yt-dlp (`%(...)s` fields are expanded by yt-dlp).
pub const SINGLE_OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";
pub const PLAYLIST_OUTPUT_TEMPLATE: &str = "%(playlist)s/%(title)s.%(ext)s";

/// Well-known install locations probed before falling back to PATH lookup.
pub const YTDLP_PROBE_PATHS: &[&str] = &[
    "/opt/homebrew/bin/yt-dlp",
    "/usr/local/bin/yt-dlp",
    "/usr/bin/yt-dlp",
];
