// src/utils.rs

use regex::Regex;
use std::sync::LazyLock;

static RATE_LIMIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?[KkMmGg]?$").unwrap());

/// Accepts yt-dlp style rate limits such as "500K", "1M", "4.2M".
pub fn is_valid_rate_limit(text: &str) -> bool {
    RATE_LIMIT_RE.is_match(text)
}

/// Truncates display text, counting wide characters as two columns.
pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 {
        text.to_string()
    } else {
        format!("{}...", &text[..end_pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_validation() {
        assert!(is_valid_rate_limit("500K"));
        assert!(is_valid_rate_limit("1M"));
        assert!(is_valid_rate_limit("4.2m"));
        assert!(is_valid_rate_limit("1048576"));
        assert!(!is_valid_rate_limit("1MB/s"));
        assert!(!is_valid_rate_limit("fast"));
        assert!(!is_valid_rate_limit(""));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 20), "short");
        let long = "a".repeat(40);
        let out = truncate_text(&long, 20);
        assert!(out.ends_with("..."));
        assert!(out.len() < long.len());
    }
}
