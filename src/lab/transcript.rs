//! Terminal transcript and command history.
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    System,
    Command,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Default,
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: u64,
    pub kind: EntryKind,
    pub text: String,
    pub tone: Tone,
}

/// Append-only log of everything printed to the simulated terminal.
///
/// Ids keep increasing across `clear` so UI keys never collide.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Transcript {
    pub fn push(&mut self, kind: EntryKind, text: impl Into<String>, tone: Tone) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            kind,
            text: text.into(),
            tone,
        });
        id
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entry currently presented as "current" (auto-scroll target).
    pub fn latest(&self) -> Option<&Entry> {
        self.entries.last()
    }

    /// Entries created after `id`, in order.
    pub fn since(&self, id: Option<u64>) -> impl Iterator<Item = &Entry> {
        self.entries
            .iter()
            .filter(move |entry| match id {
                Some(seen) => entry.id > seen,
                None => true,
            })
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shell-style history of submitted commands.
#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl CommandHistory {
    pub fn record(&mut self, command: &str) {
        self.entries.push(command.to_string());
        self.cursor = None;
    }

    /// Step toward the oldest entry (Up). Returns the text for the input line,
    /// or `None` when there is nothing to recall.
    pub fn older(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let index = match self.cursor {
            None => self.entries.len() - 1,
            Some(index) => index.saturating_sub(1),
        };
        self.cursor = Some(index);
        self.entries.get(index).map(String::as_str)
    }

    /// Step toward the newest entry (Down). Moving past the newest unsets the
    /// cursor and returns an empty string so the input line is cleared;
    /// `None` means the input should stay as it is.
    pub fn newer(&mut self) -> Option<&str> {
        let index = self.cursor? + 1;
        if index >= self.entries.len() {
            self.cursor = None;
            return Some("");
        }
        self.cursor = Some(index);
        self.entries.get(index).map(String::as_str)
    }

    #[cfg(test)]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused_after_clear() {
        let mut transcript = Transcript::default();
        let first = transcript.push(EntryKind::System, "hello", Tone::Default);
        transcript.clear();
        let second = transcript.push(EntryKind::Output, "again", Tone::Success);
        assert!(second > first);
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.latest().map(|e| e.id), Some(second));
    }

    #[test]
    fn since_returns_only_newer_entries() {
        let mut transcript = Transcript::default();
        let first = transcript.push(EntryKind::System, "a", Tone::Default);
        transcript.push(EntryKind::Output, "b", Tone::Default);
        let newer: Vec<_> = transcript.since(Some(first)).map(|e| e.text.as_str()).collect();
        assert_eq!(newer, vec!["b"]);
        assert_eq!(transcript.since(None).count(), 2);
    }

    #[test]
    fn up_walks_back_and_clamps() {
        let mut history = CommandHistory::default();
        for command in ["ls", "help", "status"] {
            history.record(command);
        }
        assert_eq!(history.older(), Some("status"));
        assert_eq!(history.older(), Some("help"));
        assert_eq!(history.older(), Some("ls"));
        assert_eq!(history.older(), Some("ls"));
        assert_eq!(history.cursor(), Some(0));
    }

    #[test]
    fn down_past_newest_clears_input() {
        let mut history = CommandHistory::default();
        history.record("ls");
        history.record("help");
        assert_eq!(history.newer(), None);
        history.older();
        history.older();
        assert_eq!(history.newer(), Some("help"));
        assert_eq!(history.newer(), Some(""));
        assert_eq!(history.cursor(), None);
        assert_eq!(history.entries().len(), 2);
    }

    #[test]
    fn empty_history_recalls_nothing() {
        let mut history = CommandHistory::default();
        assert_eq!(history.older(), None);
        assert_eq!(history.cursor(), None);
    }
}
