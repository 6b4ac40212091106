//! Status enums for runs, the orchestrator, and the backstage reveal.
//!
//! All three machines are one-directional: a run never leaves a terminal
//! status, the orchestrator never steps back from `done`, and the
//! backstage never hides again. The only reset path is starting a new
//! replay, which rebuilds the whole state bag.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a child run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Injected but not yet started.
    Paused,
    /// Actively working on its task.
    Running,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Error,
    /// Gave up after running too long.
    Timeout,
}

impl RunStatus {
    /// Whether this status is terminal.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error | Self::Timeout)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // f.pad so callers can width-align status columns.
        match self {
            Self::Paused => f.pad("paused"),
            Self::Running => f.pad("running"),
            Self::Completed => f.pad("completed"),
            Self::Error => f.pad("error"),
            Self::Timeout => f.pad("timeout"),
        }
    }
}

/// Orchestrator lifecycle: `idle` → `running` → `done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrchestratorStatus {
    /// No replay has started.
    #[default]
    Idle,
    /// A replay is in flight.
    Running,
    /// The replay reached completion and the final result is set.
    Done,
}

impl std::fmt::Display for OrchestratorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Backstage disclosure stage: `hidden` → `header` → `full`, once per replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum BackstageStage {
    /// Nothing disclosed yet.
    #[default]
    Hidden,
    /// Only the backstage header is visible.
    Header,
    /// The full backstage content is visible.
    Full,
}

impl std::fmt::Display for BackstageStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hidden => write!(f, "hidden"),
            Self::Header => write!(f, "header"),
            Self::Full => write!(f, "full"),
        }
    }
}
