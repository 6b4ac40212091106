//! Delay schedules for injection, event replay, and message reveal.
//!
//! All of the knobs that make playback feel like a live session are in
//! one place: recorded gaps are compressed into a watchable band, and
//! reveal delays scale with message length plus a little jitter so the
//! rhythm never looks metronomic.

use std::time::Duration;

use encore_core::transcript::Phase;
use rand::Rng;

/// Delay before the first run injection.
pub const FIRST_INJECTION_DELAY: Duration = Duration::from_millis(500);
/// Delay before the first start/end event of a run timeline.
pub const FIRST_EVENT_DELAY: Duration = Duration::from_millis(500);
/// Extra pause before the orchestrator goes to `Done`.
pub const COMPLETION_DELAY: Duration = Duration::from_millis(800);

const INJECTION_MIN_MS: f64 = 200.0;
const INJECTION_MAX_MS: f64 = 2000.0;
const EVENT_MIN_MS: f64 = 300.0;
const EVENT_MAX_MS: f64 = 2000.0;

/// Gap before injecting a run, given the recorded seconds since the
/// previous injection. `None` for the first run of a scenario.
#[must_use]
pub fn injection_delay(recorded_gap_secs: Option<f64>) -> Duration {
    match recorded_gap_secs {
        None => FIRST_INJECTION_DELAY,
        Some(gap) => scaled_delay(gap, INJECTION_MIN_MS, INJECTION_MAX_MS),
    }
}

/// Gap before replaying a timeline event, given the recorded seconds
/// since the previous event. `None` for the first event.
#[must_use]
pub fn event_delay(recorded_gap_secs: Option<f64>) -> Duration {
    match recorded_gap_secs {
        None => FIRST_EVENT_DELAY,
        Some(gap) => scaled_delay(gap, EVENT_MIN_MS, EVENT_MAX_MS),
    }
}

/// Compress a recorded gap into `[min_ms, max_ms]`.
fn scaled_delay(recorded_gap_secs: f64, min_ms: f64, max_ms: f64) -> Duration {
    let gap_ms = if recorded_gap_secs.is_finite() {
        recorded_gap_secs * 1000.0
    } else {
        max_ms
    };
    Duration::from_millis(to_millis(gap_ms.clamp(min_ms, max_ms)))
}

/// Pause before revealing a message, scaled by its length with random
/// jitter. Summary-phase messages reveal immediately.
#[must_use]
pub fn reveal_delay<R: Rng>(phase: Phase, content_len: usize, rng: &mut R) -> Duration {
    if phase >= Phase::Summary {
        return Duration::ZERO;
    }
    // Reports carry the longest text and get a slower, wider band.
    let (base, per_char, length_cap, jitter_span, floor) = if phase == Phase::Report {
        (700.0, 8.0, 1200.0, 600.0, 500.0)
    } else {
        (500.0, 10.0, 800.0, 400.0, 300.0)
    };

    let length_ms = (approx_f64(content_len) * per_char).min(length_cap);
    let jitter_ms = rng.gen_range(-0.5..=0.5) * jitter_span;
    let total = (base + length_ms + jitter_ms).round().max(floor);
    Duration::from_millis(to_millis(total))
}

/// Lossy usize-to-f64 for pacing math; precision loss is irrelevant at
/// message-length magnitudes.
#[allow(clippy::cast_precision_loss)]
fn approx_f64(value: usize) -> f64 {
    value as f64
}

/// Non-negative finite millisecond value to integer milliseconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_millis(ms: f64) -> u64 {
    ms.max(0.0) as u64
}
