//
//  sourcecraft-cli
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Utility Module
//!
//! Small helpers shared by the commands.
//!
//! - **Time Utilities**: [`format_relative_time`], [`format_timestamp`], [`parse_date`]
//! - **String Utilities**: [`slugify`], [`truncate`]
//! - **Size Utilities**: [`format_size`]
//!
//! ## Example
//!
//! ```rust
//! use sourcecraft_cli::util::{format_size, slugify};
//!
//! assert_eq!(slugify("My Awesome Project"), "my-awesome-project");
//! assert_eq!(format_size(1536), "1.5 KB");
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, NaiveDate};

/// Longest slug the server accepts.
const MAX_SLUG_LEN: usize = 256;

/// Human-friendly distance between `timestamp` (Unix seconds) and now.
pub fn format_relative_time(timestamp: i64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);

    relative_to(now, timestamp)
}

fn relative_to(now: i64, timestamp: i64) -> String {
    let diff = now - timestamp;

    if diff < 0 {
        return "in the future".to_string();
    }

    let diff = diff as u64;

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff < 604800 {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        match DateTime::from_timestamp(timestamp, 0) {
            Some(dt) => dt.format("%b %d, %Y").to_string(),
            None => "Unknown".to_string(),
        }
    }
}

/// Relative display for an RFC 3339 timestamp from the API.
///
/// Missing values render as `-`; unparsable values are shown verbatim.
pub fn format_timestamp(value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => "-".to_string(),
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => format_relative_time(dt.timestamp()),
            Err(_) => raw.to_string(),
        },
    }
}

/// Converts a `YYYY-MM-DD` date to an RFC 3339 timestamp at UTC midnight.
///
/// Shaped as a clap `value_parser`.
pub fn parse_date(value: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|date| format!("{}T00:00:00Z", date.format("%Y-%m-%d")))
        .map_err(|_| format!("expected a date as YYYY-MM-DD, got '{}'", value))
}

/// URL-friendly slug: lowercase ASCII letters, digits and single hyphens.
pub fn slugify(s: &str) -> String {
    let slug = s
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            'a'..='z' | '0'..='9' => Some(c),
            ' ' | '-' | '_' => Some('-'),
            _ => None,
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        return "repository".to_string();
    }
    slug.chars().take(MAX_SLUG_LEN).collect()
}

/// Shortens `s` to at most `max_len` characters, ending in `...` when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max_len).collect()
    }
}

pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
