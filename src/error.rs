// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("download failed after {attempts} attempt(s): {source}")]
    Download {
        attempts: u32,
        #[source]
        source: Box<AppError>,
    },
    #[error("extractor error: {0}")]
    Extractor(String),
    #[error("yt-dlp executable not found: {0}")]
    ExtractorNotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("temp file persist failed: {0}")]
    TempFilePersist(#[from] tempfile::PersistError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("unsupported project format '{0}', use .json or .yaml")]
    UnsupportedProjectFormat(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("interrupted by user")]
    UserInterrupt,
    #[error("{0}")] // printed verbatim, no prefix
    UserInputError(String),
    #[error("unknown error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
