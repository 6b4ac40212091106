//! Encore Core - scenario model and pure chat projections.
//!
//! This crate provides:
//! - The scenario input contract and JSON loading
//! - Live run, orchestrator, and backstage state types
//! - Time formatting, truncation, and persona assignment
//! - The deterministic chat transcript builder
//!
//! Everything here is synchronous and side-effect free. The timer-driven
//! replay machinery (drivers, reveal scheduling, backstage sequencing)
//! lives in `encore-replay`; terminal rendering lives in `encore-cli`.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod persona;
pub mod run;
pub mod scenario;
pub mod scenarios;
pub mod status;
pub mod timefmt;
pub mod transcript;

pub use persona::{Persona, PersonaMap, assign_child_letter, persona_color};
pub use run::LiveRun;
pub use scenario::{RunRecord, Scenario, ScenarioError, ScenarioLibrary};
pub use status::{BackstageStage, OrchestratorStatus, RunStatus};
pub use transcript::{ChatMessage, MessageKey, Phase, Sender, Side, build_transcript};
