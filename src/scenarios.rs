//! Scenario catalog: built-in labs plus JSON-authored labs loaded from disk.
//!
//! Built-in labs carry their checks as plain functions; JSON labs describe
//! checks as declarative rules so new labs need no recompilation.
mod environment;
mod file;
mod hardcoded;
mod shared;

pub use file::load_scenario_file;

use crate::lab::{CheckFn, FileContents, LabFile, LabScenario, Outcome, Resource, Task, TaskCheck};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Scenario started when neither the CLI nor the config names one.
pub const DEFAULT_SCENARIO_ID: &str = "hardcoded-secrets";

pub fn hardcoded_secrets() -> LabScenario {
    hardcoded::scenario()
}

pub fn shared_secrets() -> LabScenario {
    shared::scenario()
}

pub fn environment_variables() -> LabScenario {
    environment::scenario()
}

/// Row printed by `seclab list`.
#[derive(Debug, Serialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub files: usize,
    pub tasks: usize,
}

#[derive(Debug, Default)]
pub struct Catalog {
    scenarios: Vec<LabScenario>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            scenarios: vec![hardcoded_secrets(), shared_secrets(), environment_variables()],
        }
    }

    /// Add a scenario, rejecting ids that are already taken.
    pub fn add(&mut self, scenario: LabScenario) -> Result<()> {
        if self.find(&scenario.id).is_some() {
            return Err(anyhow!("duplicate scenario id {:?}", scenario.id));
        }
        self.scenarios.push(scenario);
        Ok(())
    }

    /// Load every `*.json` lab in `dir`, in file-name order.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut paths = fs::read_dir(dir)
            .with_context(|| format!("read lab dir {}", dir.display()))?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("list lab dir {}", dir.display()))?;
        paths.retain(|path| path.extension().is_some_and(|ext| ext == "json"));
        paths.sort();
        for path in &paths {
            let scenario = load_scenario_file(path)?;
            self.add(scenario)
                .with_context(|| format!("register lab {}", path.display()))?;
        }
        tracing::debug!(dir = %dir.display(), labs = paths.len(), "loaded lab dir");
        Ok(paths.len())
    }

    pub fn find(&self, id: &str) -> Option<&LabScenario> {
        self.scenarios.iter().find(|scenario| scenario.id == id)
    }

    #[cfg(test)]
    pub fn scenarios(&self) -> &[LabScenario] {
        &self.scenarios
    }

    pub fn summaries(&self) -> Vec<ScenarioSummary> {
        self.scenarios
            .iter()
            .map(|scenario| ScenarioSummary {
                id: scenario.id.clone(),
                title: scenario.title.clone(),
                description: scenario.description.clone(),
                files: scenario.files.len(),
                tasks: scenario.tasks.len(),
            })
            .collect()
    }
}

fn seed(path: &str, label: &str, language: &str, read_only: bool, content: &str) -> LabFile {
    LabFile {
        path: path.to_string(),
        label: Some(label.to_string()),
        language: Some(language.to_string()),
        read_only,
        initial_content: content.to_string(),
    }
}

fn task(id: &str, title: &str, description: &str, hint: &str, check: CheckFn) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        hint: Some(hint.to_string()),
        check: TaskCheck::Builtin(check),
    }
}

fn outcome(title: &str, message: &str) -> Outcome {
    Outcome {
        title: title.to_string(),
        message: message.to_string(),
    }
}

fn resource(label: &str, href: &str) -> Resource {
    Resource {
        label: label.to_string(),
        href: href.to_string(),
    }
}

/// Content of `path`, or empty when the file is absent.
fn text_of<'a>(files: &'a FileContents, path: &str) -> &'a str {
    files.get(path).map(String::as_str).unwrap_or_default()
}

fn contains_all<S: AsRef<str>>(source: &str, needles: &[S]) -> bool {
    needles.iter().all(|needle| source.contains(needle.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lab::{evaluate_all, FileStore};
    use std::collections::HashSet;

    #[test]
    fn builtin_ids_and_paths_are_unique() {
        let catalog = Catalog::builtin();
        let ids: HashSet<_> = catalog.scenarios().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        for scenario in catalog.scenarios() {
            let paths: HashSet<_> = scenario.files.iter().map(|f| f.path.as_str()).collect();
            assert_eq!(paths.len(), scenario.files.len(), "{}", scenario.id);
            let tasks: HashSet<_> = scenario.tasks.iter().map(|t| t.id.as_str()).collect();
            assert_eq!(tasks.len(), scenario.tasks.len(), "{}", scenario.id);
        }
        assert!(catalog.find(DEFAULT_SCENARIO_ID).is_some());
    }

    #[test]
    fn every_builtin_seed_starts_incomplete() {
        for scenario in Catalog::builtin().scenarios() {
            let store = FileStore::from_seeds(&scenario.files);
            let statuses = evaluate_all(&scenario.tasks, store.contents());
            assert!(
                statuses.iter().all(|status| !status.complete),
                "{} has a task complete at seed",
                scenario.id
            );
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut catalog = Catalog::builtin();
        let err = catalog.add(shared_secrets()).unwrap_err();
        assert!(err.to_string().contains("shared-secrets"));
    }

    #[test]
    fn bundled_labs_load_and_start_incomplete() {
        let mut catalog = Catalog::builtin();
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("labs");
        assert_eq!(catalog.load_dir(&dir).unwrap(), 1);
        let scenario = catalog.find("leaked-ci-token").expect("bundled lab");
        let store = FileStore::from_seeds(&scenario.files);
        let statuses = evaluate_all(&scenario.tasks, store.contents());
        assert!(statuses.iter().all(|status| !status.complete));
    }

    #[test]
    fn load_dir_reads_json_labs_in_name_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        for id in ["beta", "alpha"] {
            let json = format!(
                r#"{{"schema_version": 1, "id": "{id}", "title": "{id}", "description": "d",
                    "files": [{{"path": "a.txt", "initial_content": "x"}}],
                    "tasks": [{{"id": "t", "title": "T", "description": "d",
                               "rules": [{{"kind": "contains", "path": "a.txt", "needle": "y"}}]}}],
                    "success": {{"title": "ok", "message": "done"}}}}"#
            );
            std::fs::write(dir.path().join(format!("{id}.json")), json).expect("write lab");
        }
        std::fs::write(dir.path().join("notes.txt"), "ignored").expect("write notes");

        let mut catalog = Catalog::default();
        assert_eq!(catalog.load_dir(dir.path()).unwrap(), 2);
        let ids: Vec<_> = catalog.scenarios().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "beta"]);
    }
}
