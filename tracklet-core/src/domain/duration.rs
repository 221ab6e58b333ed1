//! Pure duration arithmetic over a [`TimeEntry`] snapshot.
//!
//! All arithmetic is in whole seconds. Negative terms clamp to zero rather
//! than surfacing an error: break accounting can briefly overshoot when
//! updates arrive out of order, and a live clock must never display a
//! negative value.

use time::OffsetDateTime;

use crate::domain::models::{Break, EntryStatus, TimeEntry};

/// Seconds of work accumulated by `entry` as observed at `now`, with break
/// time subtracted.
///
/// While Running this grows with `now`; in every other status it depends
/// only on the server-authoritative `total_duration` and the breaks.
pub fn elapsed_seconds(entry: &TimeEntry, now: OffsetDateTime) -> i64 {
    let base = match entry.status {
        EntryStatus::Running => {
            let running = (now - entry.last_resumed_at).whole_seconds().max(0);
            entry.total_duration + running
        }
        _ => entry.total_duration,
    };

    (base - total_break_seconds(&entry.breaks, now)).max(0)
}

/// Total seconds spent on breaks as observed at `now`.
///
/// A cached `duration` wins over the timestamps; an ongoing break counts up
/// to `now`. Each term clamps to zero so malformed records contribute
/// nothing instead of poisoning the sum.
pub fn total_break_seconds(breaks: &[Break], now: OffsetDateTime) -> i64 {
    breaks.iter().map(|b| break_seconds(b, now)).sum()
}

fn break_seconds(b: &Break, now: OffsetDateTime) -> i64 {
    let seconds = match (b.duration, b.ended_at) {
        (Some(cached), _) => cached,
        (None, Some(ended_at)) => (ended_at - b.started_at).whole_seconds(),
        (None, None) => (now - b.started_at).whole_seconds(),
    };

    seconds.max(0)
}

/// `H:MM:SS` at one hour or more, `MM:SS` below.
pub fn format_duration(total_seconds: i64) -> String {
    let total_seconds = total_seconds.max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Compact form for aggregate summaries: the largest two non-zero units
/// (`2h 15m`, `45m 30s`), falling back to seconds when sub-minute.
pub fn format_duration_human(total_seconds: i64) -> String {
    let total_seconds = total_seconds.max(0);
    let units = [
        (total_seconds / 3600, "h"),
        ((total_seconds % 3600) / 60, "m"),
        (total_seconds % 60, "s"),
    ];

    let parts: Vec<String> = units
        .iter()
        .filter(|(value, _)| *value > 0)
        .take(2)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}
