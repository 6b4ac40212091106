//! Mutable playback state shared between the replay tasks.

use std::collections::HashSet;

use encore_core::{
    BackstageStage, ChatMessage, LiveRun, MessageKey, OrchestratorStatus, PersonaMap, Phase,
    Scenario, Side, build_transcript, timefmt,
};

/// Snapshot of the "is typing" slot shown while a reveal is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingIndicator {
    /// Avatar label of the author about to speak.
    pub avatar: String,
    /// Persona color index of that author.
    pub color_idx: i32,
    /// Which side the pending message will render on.
    pub side: Side,
    /// Display label of that author.
    pub sender_label: String,
}

/// Everything the replay tasks read and write, guarded by one lock.
#[derive(Debug)]
pub(crate) struct ReplayState {
    pub(crate) prompt: String,
    pub(crate) status: OrchestratorStatus,
    pub(crate) runs: Vec<LiveRun>,
    pub(crate) final_result: Option<String>,
    pub(crate) personas: PersonaMap,
    /// Full desired transcript, recomputed after every state mutation.
    pub(crate) transcript: Vec<ChatMessage>,
    /// Number of leading transcript messages currently shown.
    pub(crate) revealed: usize,
    pub(crate) expanded: HashSet<MessageKey>,
    pub(crate) backstage_enabled: bool,
    pub(crate) backstage: BackstageStage,
    pub(crate) backstage_started: bool,
    /// Wall-clock seconds when playback began.
    pub(crate) started_at: f64,
    /// Cosmetic "time since playback began" label, ticker-maintained.
    pub(crate) orchestrator_timer: String,
}

impl ReplayState {
    pub(crate) fn new() -> Self {
        Self {
            prompt: String::new(),
            status: OrchestratorStatus::Idle,
            runs: Vec::new(),
            final_result: None,
            personas: PersonaMap::new(),
            transcript: Vec::new(),
            revealed: 0,
            expanded: HashSet::new(),
            backstage_enabled: true,
            backstage: BackstageStage::Hidden,
            backstage_started: false,
            started_at: 0.0,
            orchestrator_timer: String::new(),
        }
    }

    /// Clear everything left over from a previous playback and prime the
    /// state for the given scenario. Runs and results arrive later through
    /// the injection driver; only the prompt is known up front.
    pub(crate) fn reset_for(&mut self, scenario: &Scenario, now: f64, backstage_enabled: bool) {
        self.prompt = scenario.prompt.clone();
        self.status = OrchestratorStatus::Running;
        self.runs.clear();
        self.final_result = None;
        self.personas = PersonaMap::new();
        self.transcript.clear();
        self.revealed = 0;
        self.expanded.clear();
        self.backstage_enabled = backstage_enabled;
        self.backstage = BackstageStage::Hidden;
        self.backstage_started = false;
        self.started_at = now;
        self.orchestrator_timer = timefmt::format_elapsed(0.0);
        self.rebuild_transcript();
    }

    /// Recompute the desired transcript from current state. The builder is
    /// append-only for the state transitions the driver performs, so the
    /// revealed prefix stays valid; the clamp covers resets.
    pub(crate) fn rebuild_transcript(&mut self) {
        self.transcript = build_transcript(
            &self.prompt,
            self.status,
            &self.runs,
            self.final_result.as_deref(),
            &mut self.personas,
        );
        self.revealed = self.revealed.min(self.transcript.len());
    }

    /// Currently visible prefix of the transcript.
    pub(crate) fn visible(&self) -> &[ChatMessage] {
        &self.transcript[..self.revealed]
    }

    pub(crate) fn fully_revealed(&self) -> bool {
        self.revealed >= self.transcript.len()
    }

    /// Indicator for the next hidden message. Summary messages reveal
    /// with zero delay and show no indicator.
    pub(crate) fn typing_indicator(&self) -> Option<TypingIndicator> {
        self.transcript
            .get(self.revealed)
            .filter(|next| next.phase < Phase::Summary)
            .map(|next| TypingIndicator {
                avatar: next.avatar.clone(),
                color_idx: next.color_idx,
                side: next.side,
                sender_label: next.sender_label.clone(),
            })
    }

    pub(crate) fn run_mut(&mut self, run_id: &str) -> Option<&mut LiveRun> {
        self.runs.iter_mut().find(|run| run.run_id == run_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_core::{RunRecord, RunStatus};

    fn scenario() -> Scenario {
        Scenario {
            prompt: "test prompt".to_string(),
            runs: vec![RunRecord {
                run_id: "run-1".to_string(),
                child_session_id: "sess-a".to_string(),
                task: "do things".to_string(),
                created_at: 0.0,
                started_at: Some(1.0),
                ended_at: Some(2.0),
                status: RunStatus::Completed,
                outcome_text: None,
            }],
            final_result: None,
        }
    }

    #[test]
    fn reset_primes_intro_but_reveals_nothing() {
        let mut state = ReplayState::new();
        state.reset_for(&scenario(), 100.0, true);

        assert_eq!(state.status, OrchestratorStatus::Running);
        assert_eq!(state.transcript.len(), 1);
        assert_eq!(state.revealed, 0);
        assert!(state.visible().is_empty());
        assert!(!state.fully_revealed());

        let typing = state.typing_indicator().unwrap();
        assert_eq!(typing.side, Side::Left);
    }

    #[test]
    fn reset_clears_previous_playback() {
        let mut state = ReplayState::new();
        state.reset_for(&scenario(), 100.0, true);
        state.runs.push(LiveRun::inject(&scenario().runs[0]));
        state.rebuild_transcript();
        state.revealed = state.transcript.len();
        state.backstage = BackstageStage::Full;
        state.expanded.insert(MessageKey::Intro);

        state.reset_for(&scenario(), 200.0, false);
        assert!(state.runs.is_empty());
        assert_eq!(state.revealed, 0);
        assert!(state.expanded.is_empty());
        assert_eq!(state.backstage, BackstageStage::Hidden);
        assert!(!state.backstage_enabled);
    }

    #[test]
    fn rebuild_clamps_revealed_after_shrink() {
        let mut state = ReplayState::new();
        state.reset_for(&scenario(), 0.0, true);
        state.revealed = 1;
        state.prompt = String::new();
        state.rebuild_transcript();
        assert_eq!(state.revealed, 0);
        assert!(state.fully_revealed());
    }
}
