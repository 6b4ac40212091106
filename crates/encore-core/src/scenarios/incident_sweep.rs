use crate::scenario::{RunRecord, Scenario};
use crate::status::RunStatus;

/// Post-incident sweep: mixed outcomes, and the run created first is the
/// last to finish so report order diverges from assignment order.
pub(super) fn build() -> Scenario {
    Scenario {
        prompt: "Sweep the fleet after last night's cache outage".to_string(),
        runs: vec![
            RunRecord {
                run_id: "run-logs".to_string(),
                child_session_id: "sess-logs".to_string(),
                task: "Pull error logs from the cache tier".to_string(),
                created_at: 0.0,
                started_at: Some(1.0),
                ended_at: Some(12.5),
                status: RunStatus::Completed,
                outcome_text: Some(
                    "Pulled 48h of logs from all 12 cache nodes. Error spike starts \
                     at 02:13 UTC on node cache-07 and fans out within 90 seconds."
                        .to_string(),
                ),
            },
            RunRecord {
                run_id: "run-restart".to_string(),
                child_session_id: "sess-restart".to_string(),
                task: "Verify the rolling restart completed cleanly".to_string(),
                created_at: 0.4,
                started_at: Some(1.6),
                ended_at: Some(6.8),
                status: RunStatus::Completed,
                outcome_text: Some(
                    "All 12 nodes restarted and rejoined the ring. Hit rates back \
                     above 97% as of this check."
                        .to_string(),
                ),
            },
            RunRecord {
                run_id: "run-billing".to_string(),
                child_session_id: "sess-billing".to_string(),
                task: "Check billing pipeline for dropped events".to_string(),
                created_at: 0.9,
                started_at: Some(2.3),
                ended_at: Some(5.0),
                status: RunStatus::Error,
                outcome_text: None,
            },
            RunRecord {
                run_id: "run-replay".to_string(),
                child_session_id: "sess-replay".to_string(),
                task: "Replay the missed invalidation queue".to_string(),
                created_at: 1.2,
                started_at: Some(3.0),
                ended_at: Some(10.0),
                status: RunStatus::Timeout,
                outcome_text: None,
            },
        ],
        final_result: Some(
            "Cache tier is healthy again. Root cause traced to cache-07; billing \
             check needs a rerun once its credentials are rotated, and the \
             invalidation replay will be retried in smaller batches."
                .to_string(),
        ),
    }
}
