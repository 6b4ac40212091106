//! Reveal scheduler: paces hidden transcript messages onto the screen.
//!
//! A single task owns the reveal cursor. It sleeps a length-and-phase
//! scaled delay before each reveal, parks on the rebuild notifier when it
//! catches up with the transcript, and kicks off the backstage cascade
//! once everything is out and the orchestrator is done.

use std::sync::Arc;
use std::time::Duration;

use encore_core::OrchestratorStatus;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::backstage;
use crate::driver::sleep_or_cancelled;
use crate::pacing;
use crate::session::SessionInner;

enum Step {
    /// A hidden message is pending; reveal it after this delay.
    Reveal(Duration),
    /// Everything out and playback done; start the backstage cascade.
    StartBackstage,
    /// Caught up; park until the transcript is rebuilt.
    Idle,
}

/// Run the reveal loop until cancelled.
pub(crate) async fn run_revealer(inner: Arc<SessionInner>, cancel: CancellationToken) {
    let mut rng = StdRng::from_entropy();
    loop {
        let step = {
            let state = inner.state.read().await;
            if let Some(next) = state.transcript.get(state.revealed) {
                Step::Reveal(pacing::reveal_delay(
                    next.phase,
                    next.content.chars().count(),
                    &mut rng,
                ))
            } else if state.status == OrchestratorStatus::Done
                && state.backstage_enabled
                && !state.backstage_started
            {
                Step::StartBackstage
            } else {
                Step::Idle
            }
        };

        match step {
            Step::Reveal(delay) => {
                trace!(?delay, "reveal pending");
                if !sleep_or_cancelled(delay, &cancel).await {
                    return;
                }
                let mut state = inner.state.write().await;
                // The sleep can expire in the same tick a restart cancels
                // us; never touch state that belongs to the next playback.
                if cancel.is_cancelled() {
                    return;
                }
                state.revealed = state
                    .revealed
                    .saturating_add(1)
                    .min(state.transcript.len());
            }
            Step::StartBackstage => {
                {
                    let mut state = inner.state.write().await;
                    // A restart can cancel us between the read-lock
                    // decision and this write lock; flagging the next
                    // playback's state would suppress its backstage.
                    if cancel.is_cancelled() {
                        return;
                    }
                    state.backstage_started = true;
                }
                debug!("transcript fully revealed, starting backstage cascade");
                tokio::spawn(backstage::run_backstage(inner.clone(), cancel.clone()));
            }
            Step::Idle => {
                tokio::select! {
                    () = cancel.cancelled() => return,
                    () = inner.rebuilt.notified() => {}
                }
            }
        }
    }
}
