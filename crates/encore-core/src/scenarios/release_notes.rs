use crate::scenario::{RunRecord, Scenario};
use crate::status::RunStatus;

/// Release-notes drafting: three writers, all successful, one verbose
/// enough to exercise summary truncation.
pub(super) fn build() -> Scenario {
    Scenario {
        prompt: "Draft the v2.4 release notes".to_string(),
        runs: vec![
            RunRecord {
                run_id: "run-changelog".to_string(),
                child_session_id: "sess-changelog".to_string(),
                task: "Collect merged changelog entries".to_string(),
                created_at: 0.0,
                started_at: Some(0.8),
                ended_at: Some(4.2),
                status: RunStatus::Completed,
                outcome_text: Some(
                    "Gathered 23 merged entries since v2.3: 9 features, 11 fixes, \
                     3 docs-only changes. Grouped them by subsystem."
                        .to_string(),
                ),
            },
            RunRecord {
                run_id: "run-highlights".to_string(),
                child_session_id: "sess-highlights".to_string(),
                task: "Write the headline highlights section".to_string(),
                created_at: 0.3,
                started_at: Some(1.4),
                ended_at: Some(9.6),
                status: RunStatus::Completed,
                outcome_text: Some(
                    "Drafted three headline items. First, the new incremental sync \
                     engine cuts cold-start time roughly in half for large workspaces \
                     and no longer blocks the editor while indexing. Second, the \
                     permissions overhaul introduces per-project scopes so shared \
                     machines stop leaking credentials between accounts. Third, the \
                     plugin API is now stable, with the five most-requested hooks \
                     shipping enabled by default and a migration shim for the old \
                     beta surface. Each item links to its tracking issue."
                        .to_string(),
                ),
            },
            RunRecord {
                run_id: "run-upgrade".to_string(),
                child_session_id: "sess-upgrade".to_string(),
                task: "Document breaking changes and upgrade steps".to_string(),
                created_at: 0.6,
                started_at: Some(2.0),
                ended_at: Some(7.1),
                status: RunStatus::Completed,
                outcome_text: Some(
                    "Two breaking changes documented, both with one-line migration \
                     commands. Added a compatibility table for plugin authors."
                        .to_string(),
                ),
            },
        ],
        final_result: Some(
            "Release notes assembled: highlights up top, grouped changelog in the \
             middle, upgrade guide at the end. Ready for editorial review."
                .to_string(),
        ),
    }
}
