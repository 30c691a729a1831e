//! Sandboxed lab console core.
//!
//! A lab is a scenario (seed files plus checkable tasks) driven through a
//! simulated terminal. Everything here is in-memory and synchronous: one
//! command runs to completion before the next is accepted, and task status is
//! recomputed after every file mutation so callers never observe stale state.
mod check;
mod command;
mod console;
mod error;
mod files;
mod scenario;
mod tasks;
mod transcript;

pub use check::{normalize_whitespace, CheckFn, Rule, TaskCheck};
pub use command::{parse_command, Command, COMMAND_SUMMARY};
pub use console::{Console, ValidationState};
pub use error::LabError;
pub use files::{FileContents, FileStore};
pub use scenario::{LabFile, LabScenario, Outcome, Resource};
pub use tasks::{all_complete, evaluate_all, Task, TaskStatus};
pub use transcript::{CommandHistory, Entry, EntryKind, Tone, Transcript};
