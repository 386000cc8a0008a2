// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use std::{
    env,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use ytgrab::{cli::Cli, logging, run_from_cli};

#[tokio::main]
async fn main() {
    // Enable ANSI colors on Windows terminals.
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }

    let cancellation_token = Arc::new(AtomicBool::new(false));
    let token = cancellation_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        println!(
            "\n{} Interrupt received, stopping after the current task (press again to force quit).",
            "[!]".yellow()
        );
        token.store(true, Ordering::Relaxed);
        tokio::signal::ctrl_c().await.ok();
        println!("\n{} Forced exit.", "[!]".yellow());
        std::process::exit(130);
    });

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "ytgrab".to_string());
    let after_help = format!(
        "Examples:\n  # Interactive session\n  {bin} -i\n\n  # Single video as mp3\n  {bin} --url \"https://www.youtube.com/watch?v=...\" -f mp3\n\n  # Whole playlist, capped at 720p, with a skip archive\n  {bin} --playlist \"https://www.youtube.com/playlist?list=...\" -q 720p --archive-file seen.txt\n\n  # Batch file through the persistent queue\n  {bin} -b urls.txt --queue-file queue.json",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = Arc::new(Cli::from_arg_matches(&cmd.get_matches()).unwrap());

    logging::init(args.log_level);

    if let Err(e) = run_from_cli(args, cancellation_token).await {
        eprintln!("\n{} {}", "[X]".red(), e.to_string().red());
        std::process::exit(1);
    }
}
