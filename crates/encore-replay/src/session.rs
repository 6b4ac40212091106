//! Replay session: owner of the playback tasks and their shared state.

use std::sync::{Arc, Mutex};

use encore_core::{
    BackstageStage, ChatMessage, LiveRun, MessageKey, OrchestratorStatus, ScenarioLibrary,
};
use tokio::sync::{Notify, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::driver;
use crate::reveal;
use crate::state::{ReplayState, TypingIndicator};
use crate::ticker;

/// Shared playback state plus the rebuild notifier the reveal scheduler
/// parks on.
pub(crate) struct SessionInner {
    pub(crate) state: RwLock<ReplayState>,
    pub(crate) rebuilt: Notify,
}

/// One replay session, typically one per terminal.
///
/// Owns a scenario library, a cosmetic ticker that lives as long as the
/// session, and at most one active playback. Starting a new playback
/// cancels the previous one; [`ReplaySession::dispose`] (also run on
/// drop) cancels everything.
pub struct ReplaySession {
    inner: Arc<SessionInner>,
    library: ScenarioLibrary,
    backstage_enabled: bool,
    /// Parent of every task the session spawns.
    root: CancellationToken,
    /// Child token scoped to the current playback.
    replay: Mutex<CancellationToken>,
}

impl ReplaySession {
    /// Create a session over the given library and start its ticker.
    #[must_use]
    pub fn new(library: ScenarioLibrary) -> Self {
        let inner = Arc::new(SessionInner {
            state: RwLock::new(ReplayState::new()),
            rebuilt: Notify::new(),
        });
        let root = CancellationToken::new();
        tokio::spawn(ticker::run_ticker(inner.clone(), root.clone()));
        let replay = Mutex::new(root.child_token());
        Self {
            inner,
            library,
            backstage_enabled: true,
            root,
            replay,
        }
    }

    /// Disable or re-enable the backstage cascade for future playbacks.
    #[must_use]
    pub fn with_backstage(mut self, enabled: bool) -> Self {
        self.backstage_enabled = enabled;
        self
    }

    /// Start playing the named scenario, cancelling any playback already
    /// in flight. Returns `false` when the key is unknown and leaves the
    /// current playback untouched.
    pub async fn play(&self, key: &str) -> bool {
        let Some(scenario) = self.library.get(key).cloned() else {
            warn!(%key, "unknown scenario key");
            return false;
        };
        info!(%key, runs = scenario.runs.len(), "starting playback");

        let token = {
            let mut guard = self.replay.lock().expect("replay token mutex poisoned");
            guard.cancel();
            *guard = self.root.child_token();
            guard.clone()
        };

        {
            let mut state = self.inner.state.write().await;
            state.reset_for(&scenario, ticker::now_secs(), self.backstage_enabled);
            // The intro needs no typing pause; show it right away.
            state.revealed = state.transcript.len().min(1);
        }

        tokio::spawn(reveal::run_revealer(self.inner.clone(), token.clone()));
        tokio::spawn(driver::run_driver(self.inner.clone(), scenario, token));
        true
    }

    /// Scenario keys this session can play.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.library.keys()
    }

    /// Orchestrator status.
    pub async fn status(&self) -> OrchestratorStatus {
        self.inner.state.read().await.status
    }

    /// Cosmetic elapsed-time label for the orchestrator.
    pub async fn timer(&self) -> String {
        self.inner.state.read().await.orchestrator_timer.clone()
    }

    /// Snapshot of the live runs.
    pub async fn runs(&self) -> Vec<LiveRun> {
        self.inner.state.read().await.runs.clone()
    }

    /// Snapshot of the currently revealed messages.
    pub async fn visible_messages(&self) -> Vec<ChatMessage> {
        self.inner.state.read().await.visible().to_vec()
    }

    /// Indicator for the message about to be revealed, if any.
    pub async fn typing(&self) -> Option<TypingIndicator> {
        self.inner.state.read().await.typing_indicator()
    }

    /// Current backstage stage.
    pub async fn backstage_stage(&self) -> BackstageStage {
        self.inner.state.read().await.backstage
    }

    /// Final result text, present once playback is done.
    pub async fn final_result(&self) -> Option<String> {
        self.inner.state.read().await.final_result.clone()
    }

    /// Whether every message of the current transcript is on screen.
    pub async fn fully_revealed(&self) -> bool {
        self.inner.state.read().await.fully_revealed()
    }

    /// Flip the expanded flag for a truncated message. Returns the new
    /// state.
    pub async fn toggle_expanded(&self, key: &MessageKey) -> bool {
        let mut state = self.inner.state.write().await;
        if state.expanded.remove(key) {
            false
        } else {
            state.expanded.insert(key.clone());
            true
        }
    }

    /// Whether a message is currently expanded.
    pub async fn is_expanded(&self, key: &MessageKey) -> bool {
        self.inner.state.read().await.expanded.contains(key)
    }

    /// Cancel the playback and the ticker. Idempotent; state is left
    /// frozen at whatever was on screen.
    pub fn dispose(&self) {
        self.replay
            .lock()
            .expect("replay token mutex poisoned")
            .cancel();
        self.root.cancel();
    }
}

impl Drop for ReplaySession {
    fn drop(&mut self) {
        self.dispose();
    }
}
