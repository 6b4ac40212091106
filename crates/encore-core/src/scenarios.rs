//! Built-in replay scenarios.
//!
//! Each submodule contributes one fully scripted recording. The timestamps
//! are relative seconds within the scenario; playback rebases them onto the
//! wall clock at start.

mod incident_sweep;
mod release_notes;

use crate::scenario::ScenarioLibrary;

/// Library containing every built-in scenario.
#[must_use]
pub fn builtin() -> ScenarioLibrary {
    let mut library = ScenarioLibrary::new();
    library.insert("release-notes", release_notes::build());
    library.insert("incident-sweep", incident_sweep::build());
    library
}
