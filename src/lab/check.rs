//! Task checks: built-in predicate functions or declarative rule lists.
//!
//! Checks are pure functions of file content. A check that cannot decide
//! (bad pattern, unknown path) returns an error, which the task validator
//! treats as "not complete".
use super::FileContents;
use anyhow::{anyhow, Context, Result};
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signature of a compiled-in task predicate.
pub type CheckFn = fn(&FileContents) -> Result<bool>;

#[derive(Clone)]
pub enum TaskCheck {
    Builtin(CheckFn),
    Rules(Vec<Rule>),
}

impl TaskCheck {
    pub fn run(&self, files: &FileContents) -> Result<bool> {
        match self {
            TaskCheck::Builtin(check) => check(files),
            TaskCheck::Rules(rules) => {
                for rule in rules {
                    if !rule.holds(files)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}

impl fmt::Debug for TaskCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskCheck::Builtin(_) => f.write_str("Builtin(..)"),
            TaskCheck::Rules(rules) => f.debug_tuple("Rules").field(rules).finish(),
        }
    }
}

/// Declarative text rule evaluated against whitespace-normalized content.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum Rule {
    Contains {
        path: String,
        needle: String,
        #[serde(default)]
        negate: bool,
    },
    ContainsAll {
        path: String,
        needles: Vec<String>,
    },
    Matches {
        path: String,
        pattern: String,
        #[serde(default)]
        case_insensitive: bool,
        #[serde(default)]
        negate: bool,
    },
    NotEmpty {
        path: String,
    },
    AnyOf {
        rules: Vec<Rule>,
    },
    AllOf {
        rules: Vec<Rule>,
    },
}

impl Rule {
    pub fn holds(&self, files: &FileContents) -> Result<bool> {
        match self {
            Rule::Contains {
                path,
                needle,
                negate,
            } => {
                let content = normalized(files, path)?;
                Ok(content.contains(needle.as_str()) != *negate)
            }
            Rule::ContainsAll { path, needles } => {
                let content = normalized(files, path)?;
                Ok(needles
                    .iter()
                    .all(|needle| content.contains(needle.as_str())))
            }
            Rule::Matches {
                path,
                pattern,
                case_insensitive,
                negate,
            } => {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(*case_insensitive)
                    .build()
                    .with_context(|| format!("compile rule pattern {pattern:?}"))?;
                let content = normalized(files, path)?;
                Ok(regex.is_match(&content) != *negate)
            }
            Rule::NotEmpty { path } => Ok(!normalized(files, path)?.is_empty()),
            Rule::AnyOf { rules } => {
                for rule in rules {
                    if rule.holds(files)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Rule::AllOf { rules } => {
                for rule in rules {
                    if !rule.holds(files)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    /// Paths referenced by this rule and any nested rules.
    pub fn paths(&self) -> Vec<&str> {
        match self {
            Rule::Contains { path, .. }
            | Rule::ContainsAll { path, .. }
            | Rule::Matches { path, .. }
            | Rule::NotEmpty { path } => vec![path.as_str()],
            Rule::AnyOf { rules } | Rule::AllOf { rules } => {
                rules.iter().flat_map(Rule::paths).collect()
            }
        }
    }

    /// Patterns referenced by this rule and any nested rules.
    pub fn patterns(&self) -> Vec<&str> {
        match self {
            Rule::Matches { pattern, .. } => vec![pattern.as_str()],
            Rule::AnyOf { rules } | Rule::AllOf { rules } => {
                rules.iter().flat_map(Rule::patterns).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Collapse whitespace runs to a single space and trim the ends.
pub fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalized(files: &FileContents, path: &str) -> Result<String> {
    let content = files
        .get(path)
        .ok_or_else(|| anyhow!("rule references unknown file {path}"))?;
    Ok(normalize_whitespace(content))
}
