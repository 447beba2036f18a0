//! Time and label formatting helpers

use chrono::{DateTime, Local, Utc};

/// Format whole elapsed seconds as a `HH:MM:SS` clock string
///
/// Fields are zero-padded to two digits; hours are unbounded and widen
/// past two digits once a session crosses 100 hours.
pub fn format_clock(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format a duration compactly, e.g. `1h 2m 3s`
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Render a UTC timestamp as local wall-clock time for user-facing messages
pub fn format_wall_clock(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

/// Turn a subject identifier into its display name
///
/// `social_studies` becomes `Social Studies`.
pub fn subject_display_name(subject: &str) -> String {
    subject
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
