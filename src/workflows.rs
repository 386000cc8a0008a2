// src/workflows.rs

use crate::{
    DownloadJobContext, constants,
    download::{DownloadArchive, Downloader, DownloadQueue},
    error::{AppError, AppResult},
    models::{MediaInfo, ProgressCallback, ProgressEvent, ProgressStage},
    symbols, ui, utils,
};
use anyhow::anyhow;
use colored::*;
use indicatif::ProgressBar;
use log::{debug, error, warn};
use std::sync::{Arc, atomic::Ordering};
use url::Url;

/// Runs a single download (`--url` or `--playlist`).
pub(crate) async fn run_single(
    context: &DownloadJobContext,
    url: &str,
    is_playlist: bool,
) -> AppResult<()> {
    Url::parse(url)?;
    let mut archive = open_archive(context);
    let downloader = Downloader::new(context.extractor.clone(), context.config.clone());

    let info = downloader.get_info(url).await?;
    let label = display_label(&info, url);
    ui::print_sub_header(&format!("Downloading: {}", utils::truncate_text(&label, constants::TITLE_TRUNCATE_LENGTH)));

    if !context.args.force_redownload
        && !is_playlist
        && let Some(archive) = archive.as_mut()
        && archive.contains(&info.extractor, &info.id)?
    {
        println!(
            "{} '{}' is already in the archive, skipping. Use --force-redownload to override.",
            *symbols::SKIP,
            label.cyan()
        );
        return Ok(());
    }

    let pbar = ui::new_percent_progress_bar("Downloading");
    let downloader = downloader.with_progress_callback(bar_callback(&pbar));
    let result = if is_playlist {
        downloader.download_playlist(url).await
    } else {
        downloader.download(url).await
    };
    pbar.finish_and_clear();
    let downloaded = result?;

    if let Some(archive) = archive.as_mut() {
        record_in_archive(archive, &downloaded)?;
    }
    println!("{} Finished: {}", *symbols::OK, label.green());
    let save_dir = dunce::canonicalize(&context.config.output_dir)
        .unwrap_or_else(|_| context.config.output_dir.clone());
    println!("{} Saved under {}", *symbols::INFO, save_dir.display());
    Ok(())
}

/// Fetches and prints metadata without downloading (`--info`).
pub(crate) async fn run_info(context: &DownloadJobContext, url: &str) -> AppResult<()> {
    Url::parse(url)?;
    let downloader = Downloader::new(context.extractor.clone(), context.config.clone());
    let info = downloader.get_info(url).await?;

    ui::print_header("Media Information");
    println!("  Title:    {}", info.title.bold());
    println!("  ID:       {}", info.id);
    println!("  Site:     {}", info.extractor);
    if let Some(uploader) = &info.uploader {
        println!("  Uploader: {}", uploader);
    }
    if let Some(duration) = info.format_duration() {
        println!("  Duration: {}", duration);
    }
    if let Some(page) = &info.webpage_url {
        println!("  URL:      {}", page);
    }
    if let Some(entries) = &info.entries {
        ui::print_sub_header(&format!("Playlist entries ({})", entries.len()));
        for (i, entry) in entries.iter().enumerate() {
            println!("  {:>3}. {}", i + 1, utils::truncate_text(&entry.title, constants::TITLE_TRUNCATE_LENGTH));
        }
    }
    Ok(())
}

/// Drains a batch file through the download queue (`--batch-file`).
pub(crate) async fn run_batch(
    context: &DownloadJobContext,
    batch_file: &std::path::Path,
) -> AppResult<()> {
    let content = std::fs::read_to_string(batch_file).map_err(|e| {
        error!("failed to read batch file '{}': {}", batch_file.display(), e);
        AppError::from(e)
    })?;

    let mut urls = Vec::new();
    let mut invalid = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match Url::parse(line) {
            Ok(_) => urls.push(line.to_string()),
            Err(e) => {
                warn!("skipping invalid batch line '{}': {}", line, e);
                invalid.push(line.to_string());
            }
        }
    }

    if urls.is_empty() && invalid.is_empty() {
        ui::warn(&format!("Batch file '{}' contains no tasks.", batch_file.display()));
        return Ok(());
    }

    context.manager.start_batch(urls.len() + invalid.len());
    for line in &invalid {
        context
            .manager
            .record_skip(&utils::truncate_text(line, 60), "not a valid URL");
    }

    let queue = Arc::new(DownloadQueue::new(context.args.queue_file.clone()));
    queue.add_batch(&urls)?;
    let mut archive = open_archive(context);

    ui::print_header(&format!(
        "Batch download: {} task(s) (press {} to stop)",
        urls.len(),
        *symbols::CTRL_C
    ));

    let pbar = ui::new_tasks_progress_bar(urls.len() as u64, "Queue");
    while let Some(item) = queue.get_next() {
        if context.cancellation_token.load(Ordering::Relaxed) {
            pbar.abandon();
            return Err(AppError::UserInterrupt);
        }
        process_queue_item(context, &queue, archive.as_mut(), &item.id, &item.url).await?;
        pbar.inc(1);
    }
    pbar.finish_and_clear();

    context.manager.print_report();
    let stats = context.manager.get_stats();
    if stats.failed > 0 {
        Err(AppError::Other(anyhow!("{} batch task(s) failed", stats.failed)))
    } else {
        Ok(())
    }
}

async fn process_queue_item(
    context: &DownloadJobContext,
    queue: &Arc<DownloadQueue>,
    mut archive: Option<&mut DownloadArchive>,
    item_id: &str,
    url: &str,
) -> AppResult<()> {
    use crate::models::DownloadStatus;

    let downloader = Downloader::new(context.extractor.clone(), context.config.clone());
    let info = match downloader.get_info(url).await {
        Ok(info) => info,
        Err(e) => {
            queue.update_status(item_id, DownloadStatus::Failed, Some(&e.to_string()))?;
            context
                .manager
                .record_failure(&utils::truncate_text(url, 60), &e.to_string());
            return Ok(());
        }
    };
    let label = display_label(&info, url);

    if !context.args.force_redownload
        && !info.is_playlist()
        && let Some(archive) = archive.as_mut()
        && archive.contains(&info.extractor, &info.id)?
    {
        queue.cancel(item_id)?;
        context.manager.record_skip(&label, "already in archive");
        return Ok(());
    }

    queue.update_status(item_id, DownloadStatus::Downloading, None)?;
    ui::print_sub_header(&format!("Downloading: {}", utils::truncate_text(&label, constants::TITLE_TRUNCATE_LENGTH)));

    let pbar = ui::new_percent_progress_bar("Downloading");
    let downloader = downloader
        .with_progress_callback(queue_callback(queue.clone(), item_id.to_string(), &pbar));
    let result = if info.is_playlist() {
        downloader.download_playlist(url).await
    } else {
        downloader.download(url).await
    };
    pbar.finish_and_clear();

    match result {
        Ok(downloaded) => {
            queue.update_status(item_id, DownloadStatus::Completed, None)?;
            if let Some(archive) = archive.as_mut() {
                record_in_archive(archive, &downloaded)?;
            }
            context.manager.record_success();
            println!("{} Finished: {}", *symbols::OK, label.green());
        }
        Err(e) => {
            queue.update_status(item_id, DownloadStatus::Failed, Some(&e.to_string()))?;
            context.manager.record_failure(&label, &e.to_string());
            eprintln!("{} {}", *symbols::ERROR, e.to_string().red());
        }
    }
    Ok(())
}

/// Prompt loop for `--interactive`. An empty line exits; a URL carrying a
/// `list=` parameter offers to download the whole playlist.
pub(crate) async fn run_interactive(context: &DownloadJobContext) -> AppResult<()> {
    ui::print_header("Interactive mode");
    ui::plain(&format!(
        "Enter URLs one at a time. An empty line exits; {} quits at any point.",
        *symbols::CTRL_C
    ));

    loop {
        match ui::prompt("Enter a video or playlist URL", None) {
            Ok(input) if !input.is_empty() => {
                let result = match Url::parse(&input) {
                    Ok(parsed) => {
                        let has_list = parsed.query_pairs().any(|(key, _)| key == "list");
                        let is_playlist = has_list
                            && ui::confirm("This looks like a playlist. Download all entries?", true);
                        run_single(context, &input, is_playlist).await
                    }
                    Err(_) => Err(AppError::UserInputError(format!(
                        "'{}' is not a valid URL.",
                        input
                    ))),
                };

                if let Err(e) = result {
                    error!("interactive task '{}' failed: {}", input, e);
                    if !matches!(e, AppError::UserInterrupt) {
                        eprintln!("{} {}", *symbols::ERROR, e.to_string().red());
                    }
                }
            }
            Ok(_) => break,
            Err(_) => return Err(AppError::UserInterrupt),
        }
    }

    ui::info("Leaving interactive mode.");
    Ok(())
}

fn open_archive(context: &DownloadJobContext) -> Option<DownloadArchive> {
    context
        .config
        .download_archive
        .as_ref()
        .map(DownloadArchive::new)
}

/// Records a finished download, including every entry of a playlist.
fn record_in_archive(archive: &mut DownloadArchive, info: &MediaInfo) -> AppResult<()> {
    match &info.entries {
        Some(entries) => {
            for entry in entries {
                if !entry.id.is_empty() {
                    archive.add(&entry.extractor, &entry.id, Some(&entry.title))?;
                }
            }
        }
        None if !info.id.is_empty() => {
            archive.add(&info.extractor, &info.id, Some(&info.title))?;
        }
        None => debug!("no media id in extractor output, nothing to archive"),
    }
    Ok(())
}

fn display_label(info: &MediaInfo, url: &str) -> String {
    if info.title.is_empty() {
        url.to_string()
    } else {
        info.title.clone()
    }
}

fn bar_callback(pbar: &ProgressBar) -> ProgressCallback {
    let pbar = pbar.clone();
    Arc::new(move |event: ProgressEvent| apply_event(&pbar, &event))
}

/// Like [`bar_callback`] but also mirrors percentages into the queue, so
/// its progress callback sees live values.
fn queue_callback(
    queue: Arc<DownloadQueue>,
    item_id: String,
    pbar: &ProgressBar,
) -> ProgressCallback {
    let pbar = pbar.clone();
    Arc::new(move |event: ProgressEvent| {
        if let Some(percent) = event.percent {
            queue.update_progress(&item_id, percent);
        }
        apply_event(&pbar, &event);
    })
}

fn apply_event(pbar: &ProgressBar, event: &ProgressEvent) {
    match event.stage {
        ProgressStage::Downloading => {
            if let Some(percent) = event.percent {
                pbar.set_position(percent.round() as u64);
            }
            match (&event.speed, &event.eta) {
                (Some(speed), Some(eta)) => pbar.set_message(format!("{} ETA {}", speed, eta)),
                (Some(speed), None) => pbar.set_message(speed.clone()),
                _ => {}
            }
        }
        ProgressStage::Postprocessing => pbar.set_message("post-processing...".to_string()),
        ProgressStage::Finished => pbar.set_position(100),
    }
}
