// src/lib.rs

pub mod cli;
pub mod config;
pub mod constants;
pub mod download;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod models;
pub mod project;
pub mod symbols;
pub mod ui;
pub mod utils;
mod workflows;

use crate::{
    cli::Cli,
    config::DownloadConfig,
    download::DownloadManager,
    error::AppResult,
    extractor::{MediaExtractor, YtDlpExtractor},
};
use log::debug;
use std::sync::{Arc, atomic::AtomicBool};

/// Everything a running job needs, cloned freely across workflows.
#[derive(Clone)]
pub struct DownloadJobContext {
    pub manager: DownloadManager,
    pub config: Arc<DownloadConfig>,
    pub extractor: Arc<dyn MediaExtractor>,
    pub args: Arc<Cli>,
    pub cancellation_token: Arc<AtomicBool>,
}

/// Library entry point, called by `main.rs` after argument parsing.
pub async fn run_from_cli(args: Arc<Cli>, cancellation_token: Arc<AtomicBool>) -> AppResult<()> {
    debug!("CLI arguments: {:?}", args);

    let external = config::file::load_or_create_external_config()?;
    let config = Arc::new(DownloadConfig::from_cli(&args, &external)?);
    debug!("effective download config: {:?}", config);

    let extractor: Arc<dyn MediaExtractor> =
        Arc::new(YtDlpExtractor::new(external.ytdlp_path.as_deref()));

    let context = DownloadJobContext {
        manager: DownloadManager::new(),
        config,
        extractor,
        args: args.clone(),
        cancellation_token,
    };

    if args.interactive {
        workflows::run_interactive(&context).await?;
    } else if let Some(url) = &args.info {
        workflows::run_info(&context, url).await?;
    } else if let Some(batch_file) = &args.batch_file {
        workflows::run_batch(&context, batch_file).await?;
    } else if let Some(url) = &args.playlist {
        workflows::run_single(&context, url, true).await?;
    } else if let Some(url) = &args.url {
        workflows::run_single(&context, url, false).await?;
    }

    Ok(())
}
