// src/config.rs

pub mod file;

use crate::{
    cli::Cli,
    constants,
    error::{AppError, AppResult},
    models::{OutputFormat, VideoResolution},
    utils,
};
use self::file::ExternalConfig;
use std::path::PathBuf;

/// Everything one download invocation needs. Built once from the CLI plus
/// the external config file, then only read.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    // Output
    pub output_dir: PathBuf,
    pub output_format: OutputFormat,
    pub output_template: Option<String>,

    // Quality
    pub resolution: VideoResolution,
    pub max_filesize: Option<u64>,

    // Audio
    pub audio_quality: u32,
    pub extract_audio: bool,

    // Authentication
    pub cookies_file: Option<PathBuf>,

    // Behavior
    pub download_archive: Option<PathBuf>,
    pub write_thumbnail: bool,
    pub write_info_json: bool,
    pub embed_thumbnail: bool,
    pub embed_chapters: bool,

    // Retry policy
    pub retries: u32,
    pub retry_sleep: f64,

    // Rate limiting
    pub rate_limit: Option<String>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(constants::DEFAULT_SAVE_DIR),
            output_format: OutputFormat::Mp4,
            output_template: None,
            resolution: VideoResolution::Best,
            max_filesize: None,
            audio_quality: constants::DEFAULT_AUDIO_QUALITY,
            extract_audio: false,
            cookies_file: None,
            download_archive: None,
            write_thumbnail: false,
            write_info_json: false,
            embed_thumbnail: false,
            embed_chapters: true,
            retries: constants::DEFAULT_RETRIES,
            retry_sleep: constants::DEFAULT_RETRY_SLEEP,
            rate_limit: None,
        }
    }
}

impl DownloadConfig {
    /// Merges CLI flags over the persisted external config (CLI wins).
    pub fn from_cli(args: &Cli, external: &ExternalConfig) -> AppResult<Self> {
        let rate_limit = args.rate_limit.clone().or_else(|| external.rate_limit.clone());
        if let Some(rate) = &rate_limit
            && !utils::is_valid_rate_limit(rate)
        {
            return Err(AppError::Validation(format!(
                "invalid rate limit '{}', expected e.g. '500K' or '1M'",
                rate
            )));
        }

        Ok(Self {
            output_dir: args.output.clone(),
            output_format: args.format,
            output_template: args.output_template.clone(),
            resolution: args.resolution,
            max_filesize: None,
            audio_quality: args.audio_quality,
            extract_audio: args.format.is_audio_only(),
            cookies_file: args.cookies.clone().or_else(|| external.cookies_file.clone()),
            download_archive: args.archive_file.clone(),
            write_thumbnail: args.write_thumbnail,
            write_info_json: args.write_info_json,
            embed_thumbnail: args.embed_thumbnail,
            embed_chapters: !args.no_embed_chapters,
            retries: args.retries.or(external.retries).unwrap_or(constants::DEFAULT_RETRIES),
            retry_sleep: args
                .retry_sleep
                .or(external.retry_sleep)
                .unwrap_or(constants::DEFAULT_RETRY_SLEEP),
            rate_limit,
        })
    }

    /// Output template handed to yt-dlp, anchored under the output dir.
    pub fn output_template(&self, is_playlist: bool) -> String {
        let template = match &self.output_template {
            Some(custom) => custom.as_str(),
            None if is_playlist => constants::PLAYLIST_OUTPUT_TEMPLATE,
            None => constants::SINGLE_OUTPUT_TEMPLATE,
        };
        self.output_dir.join(template).to_string_lossy().into_owned()
    }

    /// Format selector string for yt-dlp's `-f`.
    pub fn format_selector(&self) -> String {
        if self.output_format.is_audio_only() || self.extract_audio {
            return "ba[ext=m4a]/ba/b".to_string();
        }
        match self.resolution.height() {
            Some(h) => format!(
                "bv*[height<={h}][ext=mp4]+ba[ext=m4a]/b[height<={h}][ext=mp4]/bv*+ba/b"
            ),
            None => "bv*[ext=mp4]+ba[ext=m4a]/b[ext=mp4]/bv*+ba/b".to_string(),
        }
    }

    /// Builds the yt-dlp argument vector (the Rust counterpart of the
    /// option dictionary the extraction library consumes).
    pub fn to_args(&self, is_playlist: bool) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-o".into(),
            self.output_template(is_playlist),
            "-f".into(),
            self.format_selector(),
            "--extractor-args".into(),
            "youtube:player_client=android,web".into(),
            "--no-warnings".into(),
            "--newline".into(),
            "--progress".into(),
            "--retries".into(),
            self.retries.to_string(),
            "--fragment-retries".into(),
            self.retries.to_string(),
        ];

        if is_playlist {
            args.push("--yes-playlist".into());
        } else {
            args.push("--no-playlist".into());
        }

        if !self.output_format.is_audio_only() {
            args.push("--merge-output-format".into());
            args.push(self.output_format.as_str().into());
        }

        if let Some(cookies) = &self.cookies_file
            && cookies.exists()
        {
            args.push("--cookies".into());
            args.push(cookies.to_string_lossy().into_owned());
        }

        if let Some(archive) = &self.download_archive {
            args.push("--download-archive".into());
            args.push(archive.to_string_lossy().into_owned());
        }

        if let Some(max) = self.max_filesize {
            args.push("--max-filesize".into());
            args.push(max.to_string());
        }

        if let Some(rate) = &self.rate_limit {
            args.push("--limit-rate".into());
            args.push(rate.clone());
        }

        if self.write_thumbnail {
            args.push("--write-thumbnail".into());
        }
        if self.write_info_json {
            args.push("--write-info-json".into());
        }
        if self.embed_chapters {
            args.push("--embed-chapters".into());
        }

        if self.output_format.is_audio_only() || self.extract_audio {
            args.push("-x".into());
            args.push("--audio-format".into());
            args.push(self.output_format.audio_codec().into());
            args.push("--audio-quality".into());
            args.push(format!("{}K", self.audio_quality));
            if self.embed_thumbnail {
                args.push("--embed-thumbnail".into());
            }
        }

        args
    }
}
