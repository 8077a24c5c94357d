// src/application/format.rs
//! Human-facing formatting shared by the HTML views.

use chrono::{DateTime, Utc};

/// Relative description of `then` as seen from `now`, e.g. `3 days ago`.
///
/// Thresholds follow the usual "from now" rounding: 45 seconds become a
/// minute, 45 minutes an hour, 22 hours a day, 26 days a month and 320 days a
/// year.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let future = delta.num_seconds() < 0;
    let secs = delta.num_seconds().unsigned_abs();

    let phrase = relative_phrase(secs);
    if future {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn relative_phrase(secs: u64) -> String {
    let minutes = round_div(secs, 60);
    let hours = round_div(secs, 3_600);
    let days = round_div(secs, 86_400);

    match secs {
        0..45 => "a few seconds".into(),
        45..90 => "a minute".into(),
        _ if minutes < 45 => format!("{minutes} minutes"),
        _ if minutes < 90 => "an hour".into(),
        _ if hours < 22 => format!("{hours} hours"),
        _ if hours < 36 => "a day".into(),
        _ if days < 26 => format!("{days} days"),
        _ if days < 45 => "a month".into(),
        _ if days < 320 => format!("{} months", round_div(days * 10, 304).max(2)),
        _ if days < 548 => "a year".into(),
        _ => format!("{} years", round_div(days, 365).max(2)),
    }
}

fn round_div(value: u64, by: u64) -> u64 {
    (value + by / 2) / by
}

/// Formats a download count with thousands separators: `1234567` → `1,234,567`.
pub fn format_downloads(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
