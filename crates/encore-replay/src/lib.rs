//! Encore Replay - timer-driven playback of recorded orchestration runs.
//!
//! A [`ReplaySession`] owns the animation state for one terminal: the
//! injection driver that feeds recorded runs back in on their original
//! timeline, the reveal scheduler that paces messages out one at a time,
//! the backstage sequencer, and the cosmetic one-second ticker. Starting
//! a new scenario cancels whatever was playing; disposing the session
//! cancels everything.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod backstage;
mod driver;
pub mod pacing;
mod reveal;
mod session;
mod state;
mod ticker;

pub use session::ReplaySession;
pub use state::TypingIndicator;
pub use ticker::now_secs;
