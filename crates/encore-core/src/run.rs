//! Live run state during a replay.

use crate::scenario::RunRecord;
use crate::status::RunStatus;
use crate::timefmt;

/// Mutable projection of a [`RunRecord`] while a replay is in flight.
///
/// Created `paused` with null timestamps when the driver injects it, then
/// mutated in place as timeline events fire. Identity is `run_id`; runs are
/// never removed during a replay, only cleared when a new one starts.
#[derive(Debug, Clone)]
pub struct LiveRun {
    /// Stable run identifier.
    pub run_id: String,
    /// Originating child session identifier.
    pub child_session_id: String,
    /// Task description.
    pub task: String,
    /// Recorded creation time, seconds.
    pub created_at: f64,
    /// Actual start time, set when the start event fires.
    pub started_at: Option<f64>,
    /// Actual end time, set when the end event fires.
    pub ended_at: Option<f64>,
    /// Current status.
    pub status: RunStatus,
    /// Outcome text, set by the end event.
    pub outcome_text: Option<String>,
    /// Rendered elapsed display, refreshed by the cosmetic ticker.
    pub elapsed: String,
}

impl LiveRun {
    /// Initial paused projection of a recorded run.
    #[must_use]
    pub fn inject(record: &RunRecord) -> Self {
        Self {
            run_id: record.run_id.clone(),
            child_session_id: record.child_session_id.clone(),
            task: record.task.clone(),
            created_at: record.created_at,
            started_at: None,
            ended_at: None,
            status: RunStatus::Paused,
            outcome_text: None,
            elapsed: String::new(),
        }
    }

    /// Apply a start timeline event.
    pub fn mark_started(&mut self, ts: f64) {
        self.started_at = Some(ts);
        self.status = RunStatus::Running;
    }

    /// Apply an end timeline event: timestamp, terminal status, outcome,
    /// and a final elapsed rendering from `recorded_span`, the seconds
    /// between the recorded start and end. The live timestamps track
    /// playback time and compress the recorded gaps, so they must not
    /// feed the final label; `None` (never started) renders no elapsed.
    pub fn mark_ended(
        &mut self,
        ts: f64,
        status: RunStatus,
        outcome_text: Option<String>,
        recorded_span: Option<f64>,
    ) {
        self.ended_at = Some(ts);
        self.status = status;
        self.outcome_text = outcome_text;
        self.elapsed = recorded_span.map(timefmt::format_elapsed).unwrap_or_default();
    }

    /// Refresh the elapsed display against `now` (seconds). Display-only.
    pub fn refresh_elapsed(&mut self, now: f64) {
        self.elapsed = timefmt::elapsed_between(self.started_at, self.ended_at, now);
    }
}
