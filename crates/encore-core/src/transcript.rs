//! Chat transcript projection.
//!
//! [`build_transcript`] is a pure projection of the current replay state:
//! it recomputes the full "should exist" message list from scratch on
//! every call. Reveal pacing and prefix bookkeeping live in
//! `encore-replay`; the only state carried between calls is the persona
//! map, which must persist so letter assignments never fluctuate across
//! rebuilds.

use crate::persona::{BOSS_COLOR_IDX, Persona, PersonaMap};
use crate::run::LiveRun;
use crate::status::{OrchestratorStatus, RunStatus};
use crate::timefmt::{DEFAULT_TRUNCATE_LEN, truncate_text};

/// Avatar label for the orchestrator.
pub const PARENT_AVATAR: &str = "Main";

/// Display label for the orchestrator.
pub const PARENT_LABEL: &str = "Orchestrator";

/// Conversation phase of a chat message, governing both transcript order
/// and reveal pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Orchestrator announces task decomposition.
    Intro,
    /// Orchestrator assigns one task to a child persona.
    Assignment,
    /// Child acknowledges a started task.
    Acknowledgment,
    /// Child reports a terminal outcome.
    Report,
    /// Orchestrator posts the final summary.
    Summary,
}

impl Phase {
    /// Numeric tag (0-4).
    #[must_use]
    pub fn index(self) -> u8 {
        match self {
            Self::Intro => 0,
            Self::Assignment => 1,
            Self::Acknowledgment => 2,
            Self::Report => 3,
            Self::Summary => 4,
        }
    }
}

/// Which side of the chat pane a message renders on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Orchestrator side.
    Left,
    /// Child side.
    Right,
}

/// Message author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sender {
    /// The orchestrator.
    Parent,
    /// A child, addressed by its session identifier.
    Child(String),
}

/// Stable, content-derived message address.
///
/// Positional ids are reassigned on every rebuild; this key survives
/// rebuilds, so expand/collapse state keyed on it follows the message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// The single phase-0 intro.
    Intro,
    /// Phase-1 assignment for the given run.
    Assignment(String),
    /// Phase-2 acknowledgment for the given run.
    Acknowledgment(String),
    /// Phase-3 report for the given run.
    Report(String),
    /// The single phase-4 summary.
    Summary,
}

/// One derived chat message, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Sequential id in construction order. Not stable across rebuilds;
    /// use [`ChatMessage::key`] for anything that outlives one snapshot.
    pub id: usize,
    /// Stable content key.
    pub key: MessageKey,
    /// Author.
    pub sender: Sender,
    /// Display label of the author.
    pub sender_label: String,
    /// Body text, possibly truncated.
    pub content: String,
    /// Untruncated body, present only when `content` was shortened.
    pub full_content: Option<String>,
    /// Render side.
    pub side: Side,
    /// Avatar label.
    pub avatar: String,
    /// Persona color index (`-1` orchestrator, `>= 0` child palette).
    pub color_idx: i32,
    /// Conversation phase.
    pub phase: Phase,
}

/// Build the full desired transcript for the current state.
///
/// Construction order is strict: phase 0 intro, phase 1 assignments in
/// creation order, phase 2 acknowledgments in start order, phase 3 reports
/// in end order, phase 4 summary. Deterministic given identical inputs and
/// an already-populated persona map.
#[must_use]
pub fn build_transcript(
    prompt: &str,
    status: OrchestratorStatus,
    runs: &[LiveRun],
    final_result: Option<&str>,
    personas: &mut PersonaMap,
) -> Vec<ChatMessage> {
    let mut messages = Vec::new();

    // Phase 0: orchestrator announces the decomposition.
    if !prompt.trim().is_empty() && status != OrchestratorStatus::Idle {
        push_parent(
            &mut messages,
            MessageKey::Intro,
            format!("Breaking [{prompt}] down into tasks!"),
            Phase::Intro,
        );
    }

    let mut sorted: Vec<&LiveRun> = runs.iter().collect();
    sorted.sort_by(|a, b| a.created_at.total_cmp(&b.created_at));

    // Phase 1: one assignment per known run, creation order.
    for run in &sorted {
        let persona = personas.get_or_assign(&run.child_session_id);
        push_parent(
            &mut messages,
            MessageKey::Assignment(run.run_id.clone()),
            format!(
                "{}, take on [{}] and report back when you are done.",
                persona.label, run.task
            ),
            Phase::Assignment,
        );
    }

    // Phase 2: acknowledgments from started runs, start order.
    let mut started: Vec<&LiveRun> = sorted
        .iter()
        .copied()
        .filter(|run| run.started_at.is_some())
        .collect();
    started.sort_by(|a, b| {
        a.started_at
            .unwrap_or_default()
            .total_cmp(&b.started_at.unwrap_or_default())
    });
    for run in &started {
        let persona = personas.get_or_assign(&run.child_session_id);
        push_child(
            &mut messages,
            MessageKey::Acknowledgment(run.run_id.clone()),
            format!("Understood! Starting on [{}] now.", run.task),
            None,
            Phase::Acknowledgment,
            &persona,
            &run.child_session_id,
        );
    }

    // Phase 3: reports from ended runs, end order.
    let mut ended: Vec<&LiveRun> = sorted
        .iter()
        .copied()
        .filter(|run| run.ended_at.is_some())
        .collect();
    ended.sort_by(|a, b| {
        a.ended_at
            .unwrap_or_default()
            .total_cmp(&b.ended_at.unwrap_or_default())
    });
    for run in &ended {
        let persona = personas.get_or_assign(&run.child_session_id);
        let key = MessageKey::Report(run.run_id.clone());
        match run.status {
            RunStatus::Completed => {
                let (content, full_content) = completion_report(run);
                push_child(
                    &mut messages,
                    key,
                    content,
                    full_content,
                    Phase::Report,
                    &persona,
                    &run.child_session_id,
                );
            }
            RunStatus::Error => push_child(
                &mut messages,
                key,
                format!("Sorry, [{}] hit an error and could not finish...", run.task),
                None,
                Phase::Report,
                &persona,
                &run.child_session_id,
            ),
            RunStatus::Timeout => push_child(
                &mut messages,
                key,
                format!("[{}] took too long and timed out...", run.task),
                None,
                Phase::Report,
                &persona,
                &run.child_session_id,
            ),
            // Non-terminal status despite an end timestamp: no report.
            RunStatus::Paused | RunStatus::Running => {}
        }
    }

    // Phase 4: final summary, full text, no truncation.
    if status == OrchestratorStatus::Done {
        if let Some(result) = final_result {
            push_parent(
                &mut messages,
                MessageKey::Summary,
                format!("All task results are in.\n\n{result}"),
                Phase::Summary,
            );
        }
    }

    messages
}

/// Report body for a completed run: truncated outcome summary plus a
/// separate full-text variant only when truncation actually cut something.
fn completion_report(run: &LiveRun) -> (String, Option<String>) {
    let outcome = run.outcome_text.as_deref().unwrap_or_default();
    let summary = truncate_text(outcome, DEFAULT_TRUNCATE_LEN);
    if summary.is_empty() {
        return (format!("[{}] is complete!", run.task), None);
    }
    let content = format!("[{}] is complete! Reporting results.\n{summary}", run.task);
    let full_content = (summary != outcome)
        .then(|| format!("[{}] is complete! Reporting results.\n{outcome}", run.task));
    (content, full_content)
}

fn push_parent(messages: &mut Vec<ChatMessage>, key: MessageKey, content: String, phase: Phase) {
    let id = messages.len();
    messages.push(ChatMessage {
        id,
        key,
        sender: Sender::Parent,
        sender_label: PARENT_LABEL.to_string(),
        content,
        full_content: None,
        side: Side::Left,
        avatar: PARENT_AVATAR.to_string(),
        color_idx: BOSS_COLOR_IDX,
        phase,
    });
}

fn push_child(
    messages: &mut Vec<ChatMessage>,
    key: MessageKey,
    content: String,
    full_content: Option<String>,
    phase: Phase,
    persona: &Persona,
    child_session_id: &str,
) {
    let id = messages.len();
    messages.push(ChatMessage {
        id,
        key,
        sender: Sender::Child(child_session_id.to_string()),
        sender_label: persona.label.clone(),
        content,
        full_content,
        side: Side::Right,
        avatar: persona.letter.clone(),
        color_idx: persona.color_idx,
        phase,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::RunRecord;

    fn live(run_id: &str, session: &str, created_at: f64) -> LiveRun {
        LiveRun::inject(&RunRecord {
            run_id: run_id.to_string(),
            child_session_id: session.to_string(),
            task: format!("task {run_id}"),
            created_at,
            started_at: None,
            ended_at: None,
            status: RunStatus::Paused,
            outcome_text: None,
        })
    }

    #[test]
    fn idle_or_empty_prompt_yields_no_intro() {
        let mut personas = PersonaMap::new();
        let idle = build_transcript("p", OrchestratorStatus::Idle, &[], None, &mut personas);
        assert!(idle.is_empty());

        let blank = build_transcript("  ", OrchestratorStatus::Running, &[], None, &mut personas);
        assert!(blank.is_empty());
    }

    #[test]
    fn full_lifecycle_yields_five_messages_in_order() {
        let mut personas = PersonaMap::new();
        let mut run = live("run-1", "sess-a", 0.0);
        run.mark_started(1.0);
        run.mark_ended(3.0, RunStatus::Completed, Some("done".to_string()), Some(2.0));

        let transcript = build_transcript(
            "ship it",
            OrchestratorStatus::Done,
            &[run],
            Some("All good"),
            &mut personas,
        );

        let phases: Vec<Phase> = transcript.iter().map(|m| m.phase).collect();
        assert_eq!(
            phases,
            vec![
                Phase::Intro,
                Phase::Assignment,
                Phase::Acknowledgment,
                Phase::Report,
                Phase::Summary
            ]
        );
        let ids: Vec<usize> = transcript.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);

        // Short outcome: no truncation, so no full-text variant.
        assert!(transcript[3].content.contains("done"));
        assert!(transcript[3].full_content.is_none());
        assert!(transcript[4].content.contains("All good"));
    }

    #[test]
    fn rebuild_with_identical_inputs_is_idempotent() {
        let mut personas = PersonaMap::new();
        let mut runs = vec![live("run-1", "sess-a", 0.0), live("run-2", "sess-b", 1.0)];
        runs[0].mark_started(2.0);

        let first = build_transcript(
            "p",
            OrchestratorStatus::Running,
            &runs,
            None,
            &mut personas,
        );
        let second = build_transcript(
            "p",
            OrchestratorStatus::Running,
            &runs,
            None,
            &mut personas,
        );
        assert_eq!(first, second);
    }

    #[test]
    fn run_transition_only_extends_phase_two() {
        let mut personas = PersonaMap::new();
        let mut runs = vec![live("run-1", "sess-a", 0.0), live("run-2", "sess-b", 1.0)];

        let before = build_transcript(
            "p",
            OrchestratorStatus::Running,
            &runs,
            None,
            &mut personas,
        );

        runs[1].mark_started(2.0);
        let after = build_transcript(
            "p",
            OrchestratorStatus::Running,
            &runs,
            None,
            &mut personas,
        );

        // Phase 0/1 messages for unrelated runs are untouched.
        assert_eq!(&before[..3], &after[..3]);
        assert_eq!(after.len(), 4);
        assert_eq!(after[3].phase, Phase::Acknowledgment);
        assert_eq!(after[3].key, MessageKey::Acknowledgment("run-2".to_string()));
    }

    #[test]
    fn persona_letters_stay_stable_across_rebuilds() {
        let mut personas = PersonaMap::new();
        let runs = vec![live("run-1", "sess-a", 0.0), live("run-2", "sess-b", 1.0)];
        let first = build_transcript(
            "p",
            OrchestratorStatus::Running,
            &runs,
            None,
            &mut personas,
        );
        assert!(first[1].content.starts_with("Agent A,"));
        assert!(first[2].content.starts_with("Agent B,"));

        // Even if only the later-created run remains, its letter holds.
        let only_second = vec![runs[1].clone()];
        let second = build_transcript(
            "p",
            OrchestratorStatus::Running,
            &only_second,
            None,
            &mut personas,
        );
        assert!(second[1].content.starts_with("Agent B,"));
    }

    #[test]
    fn long_outcome_gets_truncated_with_full_variant() {
        let mut personas = PersonaMap::new();
        let mut run = live("run-1", "sess-a", 0.0);
        run.mark_started(1.0);
        let outcome = "x".repeat(250);
        run.mark_ended(3.0, RunStatus::Completed, Some(outcome.clone()), Some(2.0));

        let transcript = build_transcript(
            "p",
            OrchestratorStatus::Running,
            &[run],
            None,
            &mut personas,
        );
        let report = transcript
            .iter()
            .find(|m| m.phase == Phase::Report)
            .unwrap();
        assert!(report.content.ends_with("..."));
        assert!(!report.content.contains(&outcome));
        let full = report.full_content.as_ref().unwrap();
        assert!(full.contains(&outcome));
    }

    #[test]
    fn error_and_timeout_reports_reference_the_task() {
        let mut personas = PersonaMap::new();
        let mut failed = live("run-1", "sess-a", 0.0);
        failed.mark_started(1.0);
        failed.mark_ended(2.0, RunStatus::Error, None, Some(1.0));
        let mut late = live("run-2", "sess-b", 0.5);
        late.mark_started(1.5);
        late.mark_ended(3.0, RunStatus::Timeout, None, Some(1.5));

        let transcript = build_transcript(
            "p",
            OrchestratorStatus::Running,
            &[failed, late],
            None,
            &mut personas,
        );
        let reports: Vec<&ChatMessage> = transcript
            .iter()
            .filter(|m| m.phase == Phase::Report)
            .collect();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].content.contains("task run-1"));
        assert!(reports[0].content.contains("error"));
        assert!(reports[1].content.contains("task run-2"));
        assert!(reports[1].content.contains("timed out"));
    }

    #[test]
    fn report_order_follows_end_timestamps_not_creation() {
        let mut personas = PersonaMap::new();
        let mut first_created = live("run-1", "sess-a", 0.0);
        first_created.mark_started(1.0);
        first_created.mark_ended(9.0, RunStatus::Completed, None, Some(8.0));
        let mut second_created = live("run-2", "sess-b", 1.0);
        second_created.mark_started(2.0);
        second_created.mark_ended(4.0, RunStatus::Completed, None, Some(2.0));

        let transcript = build_transcript(
            "p",
            OrchestratorStatus::Running,
            &[first_created, second_created],
            None,
            &mut personas,
        );
        let report_keys: Vec<&MessageKey> = transcript
            .iter()
            .filter(|m| m.phase == Phase::Report)
            .map(|m| &m.key)
            .collect();
        assert_eq!(
            report_keys,
            vec![
                &MessageKey::Report("run-2".to_string()),
                &MessageKey::Report("run-1".to_string())
            ]
        );
    }

    #[test]
    fn summary_requires_done_and_a_result() {
        let mut personas = PersonaMap::new();
        let running = build_transcript(
            "p",
            OrchestratorStatus::Running,
            &[],
            Some("result"),
            &mut personas,
        );
        assert!(running.iter().all(|m| m.phase != Phase::Summary));

        let done_no_result =
            build_transcript("p", OrchestratorStatus::Done, &[], None, &mut personas);
        assert!(done_no_result.iter().all(|m| m.phase != Phase::Summary));
    }
}
