// src/ui.rs

use crate::{constants, symbols};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};

pub fn print_header(title: &str) {
    println!("\n{}", "═".repeat(constants::UI_WIDTH));
    println!(" {}", title.cyan().bold());
    println!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn print_sub_header(title: &str) {
    println!("\n--- {} ---", title.bold());
}

pub fn plain(message: &str) {
    println!("{}", message);
}

pub fn info(message: &str) {
    println!("{} {}", *symbols::INFO, message);
}

pub fn warn(message: &str) {
    println!("{} {}", *symbols::WARN, message.yellow());
}

pub fn prompt(message: &str, default: Option<&str>) -> io::Result<String> {
    let default_str = default.map_or("".to_string(), |d| format!(" (default: {})", d));
    print!("\n>>> {}{}: ", message, default_str);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_string();
    if input.is_empty() {
        Ok(default.unwrap_or("").to_string())
    } else {
        Ok(input)
    }
}

pub fn confirm(question: &str, default_yes: bool) -> bool {
    let options = if default_yes { "(Y/n)" } else { "(y/N)" };
    loop {
        match prompt(
            &format!("{} {} ({} to cancel)", question, options, *symbols::CTRL_C),
            None,
        ) {
            Ok(choice) => {
                let choice = choice.to_lowercase();
                if choice == "y" {
                    return true;
                }
                if choice == "n" {
                    return false;
                }
                if choice.is_empty() {
                    return default_yes;
                }
                println!("{}", "invalid input, enter 'y' or 'n'.".red());
            }
            Err(_) => return false,
        }
    }
}

/// Counting bar for multi-item phases (batch parsing, queue draining).
pub fn new_tasks_progress_bar(total: u64, verb: &str) -> ProgressBar {
    let pbar = ProgressBar::new(total);
    pbar.set_style(
        ProgressStyle::with_template(
            "{prefix:.cyan} [{bar:40.green/white}] {pos}/{len} ({elapsed})",
        )
        .unwrap()
        .progress_chars("=> "),
    );
    pbar.set_prefix(verb.to_string());
    pbar
}

/// Percent bar fed by the extractor's progress lines (0-100).
pub fn new_percent_progress_bar(verb: &str) -> ProgressBar {
    let pbar = ProgressBar::new(100);
    pbar.set_style(
        ProgressStyle::with_template("{prefix:.cyan} [{bar:40.green/white}] {pos:>3}% {msg}")
            .unwrap()
            .progress_chars("=> "),
    );
    pbar.set_prefix(verb.to_string());
    pbar
}
