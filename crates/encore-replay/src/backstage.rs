//! Backstage cascade: staged unveiling of the run detail panel.
//!
//! Starts only after the transcript is fully revealed and playback is
//! done. Long pauses on purpose: the reader should finish the chat
//! before the machinery behind it appears.

use std::sync::Arc;
use std::time::Duration;

use encore_core::BackstageStage;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::driver::sleep_or_cancelled;
use crate::session::SessionInner;

/// Pause before the panel header appears.
pub(crate) const HEADER_DELAY: Duration = Duration::from_secs(20);
/// Further pause before the full panel appears.
pub(crate) const FULL_DELAY: Duration = Duration::from_secs(5);

/// Run the two-stage cascade, or stop silently when cancelled.
pub(crate) async fn run_backstage(inner: Arc<SessionInner>, cancel: CancellationToken) {
    if !sleep_or_cancelled(HEADER_DELAY, &cancel).await {
        return;
    }
    debug!("backstage header revealed");
    set_stage(&inner, &cancel, BackstageStage::Header).await;

    if !sleep_or_cancelled(FULL_DELAY, &cancel).await {
        return;
    }
    debug!("backstage panel revealed");
    set_stage(&inner, &cancel, BackstageStage::Full).await;
}

/// Advance the stage unless a restart cancelled us between the timer
/// firing and the lock being acquired.
async fn set_stage(inner: &SessionInner, cancel: &CancellationToken, stage: BackstageStage) {
    let mut state = inner.state.write().await;
    if !cancel.is_cancelled() {
        state.backstage = stage;
    }
}
