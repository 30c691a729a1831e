//! Line-oriented front end: piped `run` sessions and `script` batches.
//!
//! Each input line is a console command, except while an editor session is
//! open: then lines accumulate into the draft until `:wq` saves it or `:q!`
//! discards it. End of input discards any open session.
use crate::cli::LabSelection;
use crate::config::LabConfig;
use crate::lab::{Console, Entry, EntryKind, LabScenario, Tone, ValidationState};
use crate::scenarios::{load_scenario_file, Catalog, DEFAULT_SCENARIO_ID};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

pub const SAVE_MARKER: &str = ":wq";
pub const CANCEL_MARKER: &str = ":q!";

/// Pick the scenario named by the CLI, falling back to the config default.
pub fn select_scenario(
    catalog: &Catalog,
    selection: &LabSelection,
    config: &LabConfig,
) -> Result<LabScenario> {
    if let Some(path) = selection.file.as_deref() {
        return load_scenario_file(path);
    }
    let id = selection
        .scenario
        .as_deref()
        .or(config.default_scenario.as_deref())
        .unwrap_or(DEFAULT_SCENARIO_ID);
    catalog
        .find(id)
        .cloned()
        .ok_or_else(|| anyhow!("unknown lab {id:?} (see `seclab list`)"))
}

#[derive(Debug)]
pub struct LineDriver {
    console: Console,
    draft: Option<Vec<String>>,
}

impl LineDriver {
    pub fn new(console: Console) -> Self {
        Self {
            console,
            draft: None,
        }
    }

    pub fn feed(&mut self, line: &str) {
        if let Some(draft) = self.draft.as_mut() {
            match line.trim_end() {
                SAVE_MARKER => {
                    let mut content = draft.join("\n");
                    if !draft.is_empty() {
                        content.push('\n');
                    }
                    self.draft = None;
                    self.commit(content);
                }
                CANCEL_MARKER => {
                    self.draft = None;
                    self.console.cancel_editor();
                }
                _ => draft.push(line.to_string()),
            }
            return;
        }
        self.console.submit(line);
        if self.console.editor().is_some() {
            self.draft = Some(Vec::new());
        }
    }

    /// End of input: an unfinished edit is discarded.
    pub fn finish(&mut self) {
        if self.draft.take().is_some() {
            self.console.cancel_editor();
            tracing::debug!("input ended inside an edit; draft discarded");
        }
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    fn commit(&mut self, content: String) {
        let saved = self
            .console
            .set_draft(content)
            .and_then(|()| self.console.save_editor());
        if let Err(err) = saved {
            tracing::debug!(error = %err, "save rejected");
        }
    }
}

/// Plain-text rendering of one transcript entry.
pub fn render_entry(entry: &Entry) -> String {
    let prefix = match entry.tone {
        Tone::Default => "",
        Tone::Success => "[ok] ",
        Tone::Warning => "[warn] ",
        Tone::Danger => "[error] ",
    };
    format!("{prefix}{}", entry.text)
}

#[derive(Debug, Serialize)]
pub struct TaskReport<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub complete: bool,
}

/// Machine-readable summary of a finished script run.
#[derive(Debug, Serialize)]
pub struct ScriptReport<'a> {
    pub scenario_id: &'a str,
    pub entries: &'a [Entry],
    pub tasks: Vec<TaskReport<'a>>,
    pub validation: ValidationState,
    pub files: &'a BTreeMap<String, String>,
}

impl<'a> ScriptReport<'a> {
    pub fn new(console: &'a Console) -> Self {
        Self {
            scenario_id: &console.scenario().id,
            entries: console.transcript().entries(),
            tasks: console
                .statuses()
                .into_iter()
                .map(|status| TaskReport {
                    id: &status.task.id,
                    title: &status.task.title,
                    complete: status.complete,
                })
                .collect(),
            validation: console.validation(),
            files: console.files().contents(),
        }
    }
}

/// Run every line of `input` through a fresh driver.
pub fn run_script<R: BufRead>(console: Console, input: R) -> Result<LineDriver> {
    let mut driver = LineDriver::new(console);
    for line in input.lines() {
        let line = line.context("read script input")?;
        driver.feed(&line);
    }
    driver.finish();
    Ok(driver)
}

pub fn write_transcript<W: Write>(console: &Console, out: &mut W) -> Result<()> {
    for entry in console.transcript().entries() {
        writeln!(out, "{}", render_entry(entry)).context("write transcript")?;
    }
    Ok(())
}

pub fn write_report<W: Write>(console: &Console, out: &mut W) -> Result<()> {
    let report = ScriptReport::new(console);
    let text = serde_json::to_string_pretty(&report).context("serialize script report")?;
    writeln!(out, "{text}").context("write script report")?;
    Ok(())
}

/// Interactive loop for non-terminal sessions: new entries are echoed after
/// every line so a piped peer sees responses as they happen.
pub fn run_lines<R: BufRead, W: Write>(console: Console, input: R, out: &mut W) -> Result<()> {
    let mut driver = LineDriver::new(console);
    let mut seen = flush_new(&driver, None, out)?;
    for line in input.lines() {
        let line = line.context("read input")?;
        driver.feed(&line);
        seen = flush_new(&driver, seen, out)?;
    }
    driver.finish();
    flush_new(&driver, seen, out)?;
    Ok(())
}

fn flush_new<W: Write>(driver: &LineDriver, seen: Option<u64>, out: &mut W) -> Result<Option<u64>> {
    let mut last = seen;
    for entry in driver.console().transcript().since(seen) {
        // Command echoes repeat what the peer just typed.
        if entry.kind != EntryKind::Command {
            writeln!(out, "{}", render_entry(entry)).context("write output")?;
        }
        last = Some(entry.id);
    }
    out.flush().context("flush output")?;
    Ok(last)
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
