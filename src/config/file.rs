// src/config/file.rs

use crate::{
    constants,
    error::{AppError, AppResult},
};
use anyhow::{Context, anyhow};
use log::info;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Persisted defaults under `~/.ytgrab/config.json`. Every field is
/// optional; CLI flags take precedence over anything stored here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExternalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ytdlp_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_sleep: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<String>,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        Self {
            ytdlp_path: None,
            cookies_file: None,
            retries: Some(constants::DEFAULT_RETRIES),
            retry_sleep: Some(constants::DEFAULT_RETRY_SLEEP),
            rate_limit: None,
        }
    }
}

pub(super) fn get_config_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("cannot determine home directory")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

pub fn load_or_create_external_config() -> AppResult<ExternalConfig> {
    let config_path = get_config_path()?;
    if config_path.is_file() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config file '{}'", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file '{}'", config_path.display()))
            .map_err(AppError::from)
    } else {
        info!("config file {:?} missing, creating defaults.", config_path);
        let config = ExternalConfig::default_app_config();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }

        let json_content = serde_json::to_string_pretty(&config)?;
        fs::write(&config_path, json_content)?;

        Ok(config)
    }
}
