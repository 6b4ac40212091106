//! Elapsed-time formatting and display truncation.

/// Default character cap for report summaries.
pub const DEFAULT_TRUNCATE_LEN: usize = 200;

/// Format an elapsed duration in seconds as a compact human string.
///
/// Negative or non-finite input renders as an empty string. The sub-minute
/// branch checks the raw value before rounding, so `59.6` renders as
/// `"60s"` rather than `"1m0s"`. Above a minute the seconds part rounds
/// independently with no carry into the minutes (`119.6` → `"1m60s"`).
#[must_use]
pub fn format_elapsed(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return String::new();
    }
    if seconds < 60.0 {
        return format!("{}s", seconds.round());
    }
    let mins = (seconds / 60.0).floor();
    let secs = (seconds % 60.0).round();
    format!("{mins}m{secs}s")
}

/// Elapsed display for a start/end timestamp pair.
///
/// Empty when there is no start time; otherwise the span from start to end
/// (or to `now` while still open), formatted by [`format_elapsed`].
#[must_use]
pub fn elapsed_between(started_at: Option<f64>, ended_at: Option<f64>, now: f64) -> String {
    match started_at {
        None => String::new(),
        Some(start) => format_elapsed(ended_at.unwrap_or(now) - start),
    }
}

/// Truncate `text` to at most `max_len` characters, appending `"..."` when
/// anything was cut.
///
/// A plain length cut: mid-word cuts are accepted as a known trade-off.
#[must_use]
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.is_empty() {
        return String::new();
    }
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_len).collect();
    cut.push_str("...");
    cut
}
