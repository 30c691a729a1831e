//! Console state machine: command dispatch, editor sessions, and validation.
use super::{
    all_complete, evaluate_all, parse_command, Command, CommandHistory, EntryKind, FileStore,
    LabError, LabScenario, TaskStatus, Tone, Transcript, COMMAND_SUMMARY,
};
use serde::Serialize;

const DEFAULT_FAILURE_TITLE: &str = "Not quite yet";
const DEFAULT_FAILURE_MESSAGE: &str = "Finish the remaining checklist items before submitting.";
const AUTO_SUCCESS_NOTICE: &str = "✅ All tasks satisfied. Run `validate` to record your success.";
const NO_HINT: &str = "No hint available for this task. Review the description on the right.";

/// Outcome of the most recent validation for this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationState {
    #[default]
    Unvalidated,
    Success,
    Failure,
}

impl ValidationState {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationState::Unvalidated => "unvalidated",
            ValidationState::Success => "success",
            ValidationState::Failure => "failure",
        }
    }
}

/// Draft of one file while it is open in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSession {
    pub path: String,
    pub draft: String,
    pub read_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub complete: usize,
    pub total: usize,
}

/// One lab session over a single scenario.
#[derive(Debug)]
pub struct Console {
    scenario: LabScenario,
    files: FileStore,
    completion: Vec<bool>,
    transcript: Transcript,
    history: CommandHistory,
    editor: Option<EditorSession>,
    validation: ValidationState,
}

impl Console {
    pub fn new(scenario: LabScenario) -> Self {
        let files = FileStore::from_seeds(&scenario.files);
        let mut console = Self {
            scenario,
            files,
            completion: Vec::new(),
            transcript: Transcript::default(),
            history: CommandHistory::default(),
            editor: None,
            validation: ValidationState::Unvalidated,
        };
        let welcome = format!(
            "Welcome to the {}. Type 'help' to see available commands.",
            console.scenario.title
        );
        console
            .transcript
            .push(EntryKind::System, welcome, Tone::Default);
        console.refresh_tasks();
        tracing::info!(
            scenario = %console.scenario.id,
            files = console.files.len(),
            tasks = console.scenario.tasks.len(),
            "lab session started"
        );
        console
    }

    /// Run one line of input. Blank input is ignored.
    pub fn submit(&mut self, raw: &str) {
        let input = raw.trim();
        let Some(command) = parse_command(input) else {
            return;
        };
        self.transcript
            .push(EntryKind::Command, format!("$ {input}"), Tone::Default);
        // Recorded before dispatch so `reset` leaves history empty.
        self.history.record(input);
        tracing::debug!(input, "dispatch command");
        if let Err(err) = self.dispatch(command) {
            self.output(err.to_string(), err.tone());
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<(), LabError> {
        match command {
            Command::Help => {
                let lines = COMMAND_SUMMARY
                    .iter()
                    .map(|command| format!("• {command}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                self.output(format!("Available commands:\n{lines}"), Tone::Default);
            }
            Command::Ls => {
                let text = if self.files.is_empty() {
                    "(empty)".to_string()
                } else {
                    self.files.list().join("\n")
                };
                self.output(text, Tone::Default);
            }
            Command::Cat(path) => {
                let path = path.ok_or(LabError::Usage("cat <path>"))?;
                let content = self.files.read(&path)?;
                let text = format!("----- {path} -----\n{content}\n----- end -----");
                self.output(text, Tone::Default);
            }
            Command::Edit(path) => {
                let path = path.ok_or(LabError::Usage("edit <path>"))?;
                self.open_editor(&path)?;
            }
            Command::Status => {
                let lines = self
                    .statuses()
                    .iter()
                    .map(|status| {
                        let icon = if status.complete { "✅" } else { "⬜" };
                        format!("{icon} {}", status.task.title)
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                self.output(format!("Task progress:\n{lines}"), Tone::Default);
            }
            Command::Hint(id) => self.hint(id.as_deref()),
            Command::Validate => self.validate(),
            Command::Reset => self.reset(),
            Command::Clear => self.transcript.clear(),
            Command::Unknown(name) => return Err(LabError::UnknownCommand(name)),
        }
        Ok(())
    }

    fn open_editor(&mut self, path: &str) -> Result<(), LabError> {
        let file = self
            .files
            .file(path)
            .ok_or_else(|| LabError::NotFound(path.to_string()))?;
        if file.read_only {
            return Err(LabError::ReadOnly(path.to_string()));
        }
        self.editor = Some(EditorSession {
            path: path.to_string(),
            draft: file.content.to_string(),
            read_only: file.read_only,
        });
        self.output(format!("Opening editor for {path}..."), Tone::Default);
        Ok(())
    }

    fn hint(&mut self, id: Option<&str>) {
        if let Some(id) = id {
            let text = match self.scenario.task(id) {
                Some(task) => task.hint.clone().unwrap_or_else(|| NO_HINT.to_string()),
                None => {
                    self.output(format!("Unknown task id: {id}"), Tone::Warning);
                    return;
                }
            };
            self.output(text, Tone::Default);
            return;
        }
        let pending = self
            .statuses()
            .iter()
            .filter(|status| !status.complete)
            .map(|status| {
                let hint = status
                    .task
                    .hint
                    .as_deref()
                    .unwrap_or("Review the task description.");
                format!("• {}: {hint}", status.task.title)
            })
            .collect::<Vec<_>>();
        if pending.is_empty() {
            self.output("All tasks complete. No hints necessary!", Tone::Success);
        } else {
            self.output(format!("Hints:\n{}", pending.join("\n")), Tone::Default);
        }
    }

    /// Record a validation attempt without echoing a command.
    ///
    /// Success is latched: once reached, later attempts report success again
    /// until the session is reset.
    pub fn validate(&mut self) {
        if self.all_complete() || self.validation == ValidationState::Success {
            let text = format!(
                "{}\n{}",
                self.scenario.success.title, self.scenario.success.message
            );
            self.transcript
                .push(EntryKind::System, text, Tone::Success);
            self.validation = ValidationState::Success;
            tracing::info!(scenario = %self.scenario.id, "validation succeeded");
            return;
        }
        let (title, message) = match &self.scenario.failure {
            Some(failure) => (failure.title.as_str(), failure.message.as_str()),
            None => (DEFAULT_FAILURE_TITLE, DEFAULT_FAILURE_MESSAGE),
        };
        let mut text = format!("{title}\n{message}");
        let outstanding = self
            .statuses()
            .iter()
            .filter(|status| !status.complete)
            .enumerate()
            .map(|(index, status)| format!("{}. {}", index + 1, status.task.title))
            .collect::<Vec<_>>();
        if !outstanding.is_empty() {
            text.push_str("\n\nOutstanding tasks:\n");
            text.push_str(&outstanding.join("\n"));
        }
        self.transcript
            .push(EntryKind::System, text, Tone::Warning);
        self.validation = ValidationState::Failure;
        tracing::info!(
            scenario = %self.scenario.id,
            outstanding = outstanding.len(),
            "validation failed"
        );
    }

    /// Return the lab to its initial seed.
    pub fn reset(&mut self) {
        self.files.initialize(&self.scenario.files);
        self.transcript.clear();
        let notice = format!("Workspace reset. Re-loading {} files.", self.files.len());
        self.transcript
            .push(EntryKind::System, notice, Tone::Default);
        self.history.clear();
        self.editor = None;
        self.validation = ValidationState::Unvalidated;
        self.refresh_tasks();
        tracing::info!(scenario = %self.scenario.id, "lab reset");
    }

    /// Replace the draft of the open editor session.
    pub fn set_draft(&mut self, draft: impl Into<String>) -> Result<(), LabError> {
        let session = self.editor.as_mut().ok_or(LabError::NoEditor)?;
        session.draft = draft.into();
        Ok(())
    }

    /// Commit the open editor session to the file store.
    pub fn save_editor(&mut self) -> Result<(), LabError> {
        let session = self.editor.take().ok_or(LabError::NoEditor)?;
        if let Err(err) = self.files.write(&session.path, &session.draft) {
            self.output(err.to_string(), err.tone());
            return Err(err);
        }
        tracing::debug!(path = %session.path, bytes = session.draft.len(), "file saved");
        self.output(format!("Saved {}", session.path), Tone::Default);
        self.refresh_tasks();
        Ok(())
    }

    /// Discard the open editor session without committing. Returns whether a
    /// session was open.
    pub fn cancel_editor(&mut self) -> bool {
        let cancelled = self.editor.take();
        if let Some(session) = &cancelled {
            tracing::debug!(path = %session.path, "edit cancelled");
        }
        cancelled.is_some()
    }

    /// Recall the previous history entry (Up).
    pub fn history_up(&mut self) -> Option<String> {
        self.history.older().map(str::to_string)
    }

    /// Recall the next history entry (Down); `Some("")` clears the input.
    pub fn history_down(&mut self) -> Option<String> {
        self.history.newer().map(str::to_string)
    }

    pub fn statuses(&self) -> Vec<TaskStatus<'_>> {
        self.scenario
            .tasks
            .iter()
            .zip(&self.completion)
            .map(|(task, complete)| TaskStatus {
                task,
                complete: *complete,
            })
            .collect()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            complete: self.completion.iter().filter(|complete| **complete).count(),
            total: self.completion.len(),
        }
    }

    pub fn all_complete(&self) -> bool {
        self.completion.iter().all(|complete| *complete)
    }

    pub fn scenario(&self) -> &LabScenario {
        &self.scenario
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[cfg(test)]
    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn editor(&self) -> Option<&EditorSession> {
        self.editor.as_ref()
    }

    pub fn validation(&self) -> ValidationState {
        self.validation
    }

    fn output(&mut self, text: impl Into<String>, tone: Tone) {
        self.transcript.push(EntryKind::Output, text, tone);
    }

    /// Re-evaluate every task against the current files and announce the
    /// transition to fully complete once per session.
    fn refresh_tasks(&mut self) {
        let statuses = evaluate_all(&self.scenario.tasks, self.files.contents());
        let complete = all_complete(&statuses);
        self.completion = statuses.iter().map(|status| status.complete).collect();
        if complete && self.validation != ValidationState::Success {
            self.transcript
                .push(EntryKind::System, AUTO_SUCCESS_NOTICE, Tone::Success);
            self.validation = ValidationState::Success;
            tracing::info!(scenario = %self.scenario.id, "all tasks satisfied");
        }
    }
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod tests;
