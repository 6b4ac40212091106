//! Injection driver: replays a recorded scenario into live state.
//!
//! Three stages, all on compressed recorded gaps: inject runs in creation
//! order, fire start/end timeline events in recorded order, then post the
//! final result. Every mutation rebuilds the transcript and wakes the
//! reveal scheduler.

use std::sync::Arc;
use std::time::Duration;

use encore_core::{LiveRun, OrchestratorStatus, RunRecord, RunStatus, Scenario};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::pacing;
use crate::session::SessionInner;
use crate::ticker::now_secs;

/// One recorded start or end, flattened out of the run records for
/// chronological replay.
struct TimelineEvent {
    ts: f64,
    run_id: String,
    kind: EventKind,
}

enum EventKind {
    Start,
    End {
        status: RunStatus,
        outcome_text: Option<String>,
        /// Recorded start-to-end seconds, for the final elapsed label.
        /// Live stamps are compressed and must not feed it.
        recorded_span: Option<f64>,
    },
}

impl EventKind {
    /// Starts sort before ends at equal timestamps.
    fn rank(&self) -> u8 {
        match self {
            Self::Start => 0,
            Self::End { .. } => 1,
        }
    }
}

/// Sleep unless cancelled first. Returns `false` on cancellation.
pub(crate) async fn sleep_or_cancelled(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        () = cancel.cancelled() => false,
        () = tokio::time::sleep(duration) => true,
    }
}

/// Drive one scenario to completion, or stop silently when cancelled.
pub(crate) async fn run_driver(
    inner: Arc<SessionInner>,
    scenario: Scenario,
    cancel: CancellationToken,
) {
    let mut records = scenario.runs.clone();
    records.sort_by(|a, b| a.created_at.total_cmp(&b.created_at));

    // Stage 1: inject runs, paused, in creation order.
    let mut prev_created = None;
    for record in &records {
        let gap = prev_created.map(|prev: f64| record.created_at - prev);
        if !sleep_or_cancelled(pacing::injection_delay(gap), &cancel).await {
            return;
        }
        debug!(run_id = %record.run_id, task = %record.task, "injecting run");
        {
            let mut state = inner.state.write().await;
            if cancel.is_cancelled() {
                return;
            }
            state.runs.push(LiveRun::inject(record));
            state.rebuild_transcript();
        }
        inner.rebuilt.notify_one();
        prev_created = Some(record.created_at);
    }

    // Stage 2: fire start/end events in recorded order.
    let mut prev_ts = None;
    for event in timeline(&records) {
        let gap = prev_ts.map(|prev: f64| event.ts - prev);
        if !sleep_or_cancelled(pacing::event_delay(gap), &cancel).await {
            return;
        }
        let now = now_secs();
        {
            let mut state = inner.state.write().await;
            if cancel.is_cancelled() {
                return;
            }
            if let Some(run) = state.run_mut(&event.run_id) {
                match event.kind {
                    EventKind::Start => {
                        debug!(run_id = %event.run_id, "run started");
                        run.mark_started(now);
                    }
                    EventKind::End {
                        status,
                        outcome_text,
                        recorded_span,
                    } => {
                        debug!(run_id = %event.run_id, %status, "run ended");
                        run.mark_ended(now, status, outcome_text, recorded_span);
                    }
                }
            }
            state.rebuild_transcript();
        }
        inner.rebuilt.notify_one();
        prev_ts = Some(event.ts);
    }

    // Stage 3: settle, then post the final result.
    if !sleep_or_cancelled(pacing::COMPLETION_DELAY, &cancel).await {
        return;
    }
    debug!("scenario playback complete");
    {
        let mut state = inner.state.write().await;
        if cancel.is_cancelled() {
            return;
        }
        state.status = OrchestratorStatus::Done;
        state.final_result = scenario.final_result.clone();
        state.rebuild_transcript();
    }
    inner.rebuilt.notify_one();
}

/// Flatten recorded runs into a chronological event list.
fn timeline(records: &[RunRecord]) -> Vec<TimelineEvent> {
    let mut events = Vec::new();
    for record in records {
        if let Some(ts) = record.started_at {
            events.push(TimelineEvent {
                ts,
                run_id: record.run_id.clone(),
                kind: EventKind::Start,
            });
        }
        if let Some(ts) = record.ended_at {
            events.push(TimelineEvent {
                ts,
                run_id: record.run_id.clone(),
                kind: EventKind::End {
                    status: record.status,
                    outcome_text: record.outcome_text.clone(),
                    recorded_span: record.started_at.map(|started| ts - started),
                },
            });
        }
    }
    events.sort_by(|a, b| {
        a.ts.total_cmp(&b.ts)
            .then_with(|| a.kind.rank().cmp(&b.kind.rank()))
    });
    events
}
