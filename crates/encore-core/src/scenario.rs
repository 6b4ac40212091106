//! Scenario input contract and the keyed scenario library.
//!
//! Scenarios are externally supplied static records: pre-validated at load
//! time, never mutated afterwards. The replay machinery only reads this
//! shape.

use crate::status::RunStatus;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating scenario data.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Scenario file could not be read.
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    /// Scenario JSON is malformed.
    #[error("failed to parse scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Scenario violates the input contract.
    #[error("invalid scenario: {reason}")]
    Invalid {
        /// What the contract check found.
        reason: String,
    },
}

/// One pre-recorded child task run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Stable run identifier, unique within the scenario.
    pub run_id: String,
    /// Originating child session identifier (persona key).
    pub child_session_id: String,
    /// Task description handed to the child.
    pub task: String,
    /// Recorded creation time, seconds.
    pub created_at: f64,
    /// Recorded start time, seconds, if the run ever started.
    #[serde(default)]
    pub started_at: Option<f64>,
    /// Recorded end time, seconds, if the run ever ended.
    #[serde(default)]
    pub ended_at: Option<f64>,
    /// Terminal (or last recorded) status.
    pub status: RunStatus,
    /// Outcome summary produced by the child, if any.
    #[serde(default)]
    pub outcome_text: Option<String>,
}

/// A pre-recorded orchestration scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// The prompt the orchestrator decomposed.
    pub prompt: String,
    /// Child runs in recorded order.
    pub runs: Vec<RunRecord>,
    /// The orchestrator's final aggregated result, if the recording has
    /// one. Without it the summary message is skipped.
    #[serde(rename = "finalResult", default)]
    pub final_result: Option<String>,
}

impl Scenario {
    /// Parse and validate a scenario from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Json`] for malformed JSON and
    /// [`ScenarioError::Invalid`] when the contract checks fail.
    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Read, parse, and validate a scenario file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Io`] when the file cannot be read, plus
    /// everything [`Scenario::from_json_str`] can return.
    pub fn from_json_file(path: &Path) -> Result<Self, ScenarioError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Check the input contract: non-empty prompt, unique run ids, and
    /// end-after-start timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Invalid`] naming the first violation.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.prompt.trim().is_empty() {
            return Err(ScenarioError::Invalid {
                reason: "prompt must not be empty".to_string(),
            });
        }
        let mut seen = HashSet::new();
        for run in &self.runs {
            if !seen.insert(run.run_id.as_str()) {
                return Err(ScenarioError::Invalid {
                    reason: format!("duplicate run_id: {}", run.run_id),
                });
            }
            if let (Some(started), Some(ended)) = (run.started_at, run.ended_at) {
                if ended < started {
                    return Err(ScenarioError::Invalid {
                        reason: format!("run {}: ended_at precedes started_at", run.run_id),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Keyed collection of playable scenarios.
///
/// Lookup of an unknown key is simply `None`; the replay session turns
/// that into its silent no-op guard.
#[derive(Debug, Default)]
pub struct ScenarioLibrary {
    scenarios: BTreeMap<String, Scenario>,
}

impl ScenarioLibrary {
    /// Create an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Library with every built-in demo scenario registered.
    #[must_use]
    pub fn builtin() -> Self {
        crate::scenarios::builtin()
    }

    /// Register `scenario` under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, scenario: Scenario) {
        self.scenarios.insert(key.into(), scenario);
    }

    /// Look up a scenario by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Scenario> {
        self.scenarios.get(key)
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    /// Number of registered scenarios.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether the library is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(run_id: &str) -> RunRecord {
        RunRecord {
            run_id: run_id.to_string(),
            child_session_id: "sess-a".to_string(),
            task: "do the thing".to_string(),
            created_at: 0.0,
            started_at: Some(1.0),
            ended_at: Some(3.0),
            status: RunStatus::Completed,
            outcome_text: Some("done".to_string()),
        }
    }

    #[test]
    fn json_contract_round_trips() {
        let scenario = Scenario {
            prompt: "ship it".to_string(),
            runs: vec![record("run-1")],
            final_result: Some("All good".to_string()),
        };
        let json = serde_json::to_string(&scenario).unwrap();
        // External contract spells the final result in camelCase.
        assert!(json.contains("\"finalResult\":\"All good\""));
        assert!(json.contains("\"status\":\"completed\""));

        let back = Scenario::from_json_str(&json).unwrap();
        assert_eq!(back.prompt, "ship it");
        assert_eq!(back.runs.len(), 1);
        assert_eq!(back.final_result.as_deref(), Some("All good"));
    }

    #[test]
    fn optional_fields_default_to_absent() {
        let json = r#"{
            "prompt": "p",
            "runs": [{
                "run_id": "r1",
                "child_session_id": "s1",
                "task": "t",
                "created_at": 0.5,
                "status": "paused"
            }],
            "finalResult": "fr"
        }"#;
        let scenario = Scenario::from_json_str(json).unwrap();
        let run = &scenario.runs[0];
        assert_eq!(run.started_at, None);
        assert_eq!(run.ended_at, None);
        assert_eq!(run.outcome_text, None);
    }

    #[test]
    fn validation_rejects_contract_violations() {
        let empty_prompt = Scenario {
            prompt: "  ".to_string(),
            runs: vec![],
            final_result: None,
        };
        assert!(empty_prompt.validate().is_err());

        let duplicate = Scenario {
            prompt: "p".to_string(),
            runs: vec![record("run-1"), record("run-1")],
            final_result: None,
        };
        assert!(duplicate.validate().is_err());

        let mut backwards = record("run-1");
        backwards.started_at = Some(5.0);
        backwards.ended_at = Some(2.0);
        let inverted = Scenario {
            prompt: "p".to_string(),
            runs: vec![backwards],
            final_result: None,
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn library_lookup_misses_are_none() {
        let library = ScenarioLibrary::builtin();
        assert!(!library.is_empty());
        assert!(library.get("no-such-scenario").is_none());
        for key in library.keys() {
            assert!(library.get(key).is_some());
        }
    }
}
