//! JSON-authored lab scenarios.
//!
//! Files are strictly validated so a lab that loads is a lab whose checks can
//! run: every rule names a declared file and every pattern compiles.
use crate::lab::{LabFile, LabScenario, Outcome, Resource, Rule, Task, TaskCheck};
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const SCENARIO_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    pub schema_version: u32,
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub intro_steps: Vec<String>,
    #[serde(default)]
    pub walkthrough_steps: Vec<String>,
    pub files: Vec<LabFile>,
    pub tasks: Vec<TaskSpec>,
    pub success: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<Outcome>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TaskSpec {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub rules: Vec<Rule>,
}

/// Load and validate a scenario file from disk.
pub fn load_scenario_file(path: &Path) -> Result<LabScenario> {
    let bytes = fs::read(path).with_context(|| format!("read lab {}", path.display()))?;
    let file: ScenarioFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse lab JSON {}", path.display()))?;
    validate_scenario_file(&file).with_context(|| format!("validate lab {}", path.display()))?;
    tracing::debug!(path = %path.display(), id = %file.id, "loaded lab file");
    Ok(file.into_scenario())
}

pub fn validate_scenario_file(file: &ScenarioFile) -> Result<()> {
    if file.schema_version != SCENARIO_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported lab schema_version {}",
            file.schema_version
        ));
    }
    if file.id.trim().is_empty() {
        return Err(anyhow!("lab id must not be empty"));
    }
    if file.title.trim().is_empty() {
        return Err(anyhow!("lab {} title must not be empty", file.id));
    }

    let mut paths = HashSet::new();
    for seed in &file.files {
        if seed.path.trim().is_empty() {
            return Err(anyhow!("file path must not be empty"));
        }
        if !paths.insert(seed.path.as_str()) {
            return Err(anyhow!("duplicate file path {:?}", seed.path));
        }
    }

    let mut task_ids = HashSet::new();
    for task in &file.tasks {
        if task.id.trim().is_empty() {
            return Err(anyhow!("task id must not be empty"));
        }
        if !task_ids.insert(task.id.to_ascii_lowercase()) {
            return Err(anyhow!("duplicate task id {:?}", task.id));
        }
        if task.rules.is_empty() {
            return Err(anyhow!("task {} must declare at least one rule", task.id));
        }
        for rule in &task.rules {
            validate_rule(rule, &paths).with_context(|| format!("task {}", task.id))?;
        }
    }
    Ok(())
}

fn validate_rule(rule: &Rule, paths: &HashSet<&str>) -> Result<()> {
    if let Rule::AnyOf { rules } | Rule::AllOf { rules } = rule {
        if rules.is_empty() {
            return Err(anyhow!("rule groups must not be empty"));
        }
    }
    for path in rule.paths() {
        if !paths.contains(path) {
            return Err(anyhow!("rule references undeclared file {path:?}"));
        }
    }
    for pattern in rule.patterns() {
        Regex::new(pattern).with_context(|| format!("compile rule pattern {pattern:?}"))?;
    }
    Ok(())
}

impl ScenarioFile {
    pub fn into_scenario(self) -> LabScenario {
        let tasks = self
            .tasks
            .into_iter()
            .map(|spec| Task {
                id: spec.id,
                title: spec.title,
                description: spec.description,
                hint: spec.hint,
                check: TaskCheck::Rules(spec.rules),
            })
            .collect();
        LabScenario {
            id: self.id,
            title: self.title,
            description: self.description,
            intro_steps: self.intro_steps,
            walkthrough_steps: self.walkthrough_steps,
            files: self.files,
            tasks,
            success: self.success,
            failure: self.failure,
            resources: self.resources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lab::Console;

    const LAB: &str = r##"{
  "schema_version": 1,
  "id": "ci-token",
  "title": "Lab: Rotate a CI Token",
  "description": "A CI token is committed to the workflow file.",
  "files": [
    { "path": "ci.yml", "initial_content": "env:\n  TOKEN: ghp_leaked\n" },
    { "path": "README.md", "read_only": true, "initial_content": "# CI\n" }
  ],
  "tasks": [
    {
      "id": "drop-token",
      "title": "Remove the token",
      "description": "Reference a CI secret instead.",
      "hint": "Use ${{ secrets.TOKEN }}.",
      "rules": [
        { "kind": "contains", "path": "ci.yml", "needle": "ghp_", "negate": true },
        { "kind": "matches", "path": "ci.yml", "pattern": "secrets\\.TOKEN" }
      ]
    }
  ],
  "success": { "title": "Rotated", "message": "Token removed." }
}"##;

    fn parse(json: &str) -> ScenarioFile {
        serde_json::from_str(json).expect("parse lab")
    }

    #[test]
    fn loads_and_runs_rule_tasks() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("ci.json");
        std::fs::write(&path, LAB).expect("write lab");

        let scenario = load_scenario_file(&path).unwrap();
        assert_eq!(scenario.id, "ci-token");
        assert!(scenario.failure.is_none());

        let mut console = Console::new(scenario);
        assert_eq!(console.progress().complete, 0);
        console.submit("edit ci.yml");
        console
            .set_draft("env:\n  TOKEN: ${{ secrets.TOKEN }}\n")
            .unwrap();
        console.save_editor().unwrap();
        assert!(console.all_complete());
    }

    #[test]
    fn rejects_unknown_fields_and_versions() {
        assert!(serde_json::from_str::<ScenarioFile>(&LAB.replace("\"files\"", "\"extra\": 1, \"files\"")).is_err());
        let mut file = parse(LAB);
        file.schema_version = 2;
        let err = validate_scenario_file(&file).unwrap_err();
        assert!(err.to_string().contains("schema_version 2"));
    }

    #[test]
    fn rejects_undeclared_paths_and_bad_patterns() {
        let file = parse(&LAB.replace("\"path\": \"ci.yml\", \"pattern\"", "\"path\": \"other.yml\", \"pattern\""));
        let err = validate_scenario_file(&file).unwrap_err();
        assert!(format!("{err:#}").contains("undeclared file \"other.yml\""));

        let file = parse(&LAB.replace("secrets\\\\.TOKEN", "(unclosed"));
        let err = validate_scenario_file(&file).unwrap_err();
        assert!(format!("{err:#}").contains("compile rule pattern"));
    }

    #[test]
    fn rejects_duplicates_and_ruleless_tasks() {
        let mut file = parse(LAB);
        file.files.push(file.files[0].clone());
        assert!(validate_scenario_file(&file).is_err());

        let mut file = parse(LAB);
        let mut twin = file.tasks[0].clone();
        twin.id = "DROP-TOKEN".to_string();
        file.tasks.push(twin);
        assert!(validate_scenario_file(&file).is_err());

        let mut file = parse(LAB);
        file.tasks[0].rules.clear();
        let err = validate_scenario_file(&file).unwrap_err();
        assert!(err.to_string().contains("at least one rule"));
    }
}
