//! Cosmetic one-second ticker.
//!
//! Refreshes the orchestrator timer and per-run elapsed labels once a
//! second. Display-only: nothing the driver or reveal scheduler depends
//! on is touched here, and missed ticks are skipped rather than bursted.

use std::sync::Arc;
use std::time::Duration;

use encore_core::{OrchestratorStatus, RunStatus};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::session::SessionInner;
use crate::state::ReplayState;

/// Current wall-clock time in fractional seconds.
#[must_use]
pub fn now_secs() -> f64 {
    millis_to_secs(chrono::Utc::now().timestamp_millis())
}

/// Millisecond precision is plenty for display labels.
#[allow(clippy::cast_precision_loss)]
fn millis_to_secs(millis: i64) -> f64 {
    millis as f64 / 1000.0
}

/// Run the ticker until cancelled.
pub(crate) async fn run_ticker(inner: Arc<SessionInner>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            () = cancel.cancelled() => return,
            _ = interval.tick() => {}
        }
        let mut state = inner.state.write().await;
        tick(&mut state, now_secs());
    }
}

fn tick(state: &mut ReplayState, now: f64) {
    if state.status == OrchestratorStatus::Running {
        state.orchestrator_timer = encore_core::timefmt::format_elapsed(now - state.started_at);
    }
    for run in &mut state.runs {
        if matches!(run.status, RunStatus::Running | RunStatus::Paused) {
            run.refresh_elapsed(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_core::{LiveRun, RunRecord};

    fn state_with_run() -> ReplayState {
        let mut state = ReplayState::new();
        state.status = OrchestratorStatus::Running;
        state.started_at = 100.0;
        let mut run = LiveRun::inject(&RunRecord {
            run_id: "run-1".to_string(),
            child_session_id: "sess-a".to_string(),
            task: "task".to_string(),
            created_at: 0.0,
            started_at: None,
            ended_at: None,
            status: RunStatus::Paused,
            outcome_text: None,
        });
        run.mark_started(110.0);
        state.runs.push(run);
        state
    }

    #[test]
    fn tick_refreshes_running_labels() {
        let mut state = state_with_run();
        tick(&mut state, 175.0);
        assert_eq!(state.orchestrator_timer, "1m15s");
        assert_eq!(state.runs[0].elapsed, "1m5s");
    }

    #[test]
    fn tick_leaves_terminal_runs_alone() {
        let mut state = state_with_run();
        state.runs[0].mark_ended(120.0, RunStatus::Completed, None, Some(10.0));
        state.status = OrchestratorStatus::Done;
        let frozen = state.runs[0].elapsed.clone();
        let timer = state.orchestrator_timer.clone();

        tick(&mut state, 500.0);
        assert_eq!(state.runs[0].elapsed, frozen);
        assert_eq!(state.orchestrator_timer, timer);
    }
}
