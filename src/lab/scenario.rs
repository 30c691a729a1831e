//! Scenario declarations consumed by the console.
//!
//! A scenario is immutable once handed to a console; reset re-seeds from the
//! same value rather than from any stored state.
use super::Task;
use serde::{Deserialize, Serialize};

/// Seed for one virtual file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LabFile {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    pub initial_content: String,
}

/// Title/message pair shown when validation succeeds or fails.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Outcome {
    pub title: String,
    pub message: String,
}

/// Supporting link rendered next to the checklist.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Resource {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone)]
pub struct LabScenario {
    pub id: String,
    pub title: String,
    pub description: String,
    pub intro_steps: Vec<String>,
    pub walkthrough_steps: Vec<String>,
    pub files: Vec<LabFile>,
    pub tasks: Vec<Task>,
    pub success: Outcome,
    pub failure: Option<Outcome>,
    pub resources: Vec<Resource>,
}

impl LabScenario {
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks
            .iter()
            .find(|task| task.id.eq_ignore_ascii_case(id))
    }
}
