use chrono::{DateTime, Utc};

// Format a timestamp for logging and reports
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

// Epoch milliseconds to a readable timestamp; out-of-range values print raw
pub fn format_timestamp(timestamp_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_ms) {
        Some(dt) => format_time(&dt),
        None => format!("{} ms", timestamp_ms),
    }
}

// Utility to truncate long strings for logging
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len).collect();
        format!("{}...", truncated)
    }
}
