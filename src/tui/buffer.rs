//! Editable text with a character-index cursor.
//!
//! Used for both the single-line command input and the multi-line editor
//! modal. Cursor positions count `char`s, never bytes.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    /// Buffer with the cursor at the start of `text`.
    pub(super) fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
        }
    }

    pub(super) fn text(&self) -> &str {
        &self.text
    }

    pub(super) fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the contents and park the cursor at the end.
    pub(super) fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.len();
    }

    pub(super) fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub(super) fn insert(&mut self, insert: &str) {
        let (left, right) = self.split_at_cursor();
        let mut out = left;
        out.push_str(insert);
        out.push_str(&right);
        self.text = out;
        self.cursor = (self.cursor + insert.chars().count()).min(self.len());
    }

    pub(super) fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.remove_at(self.cursor - 1);
        self.cursor -= 1;
    }

    pub(super) fn delete(&mut self) {
        if self.cursor < self.len() {
            self.remove_at(self.cursor);
        }
    }

    pub(super) fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub(super) fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    /// Start of the current line.
    pub(super) fn home(&mut self) {
        let (line, _) = self.line_col();
        self.cursor = self.line_starts()[line];
    }

    /// End of the current line.
    pub(super) fn end(&mut self) {
        let (line, _) = self.line_col();
        self.cursor = self.line_starts()[line] + self.line_len(line);
    }

    pub(super) fn up(&mut self) {
        let (line, col) = self.line_col();
        if line == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.line_starts()[line - 1] + col.min(self.line_len(line - 1));
    }

    pub(super) fn down(&mut self) {
        let (line, col) = self.line_col();
        let starts = self.line_starts();
        if line + 1 >= starts.len() {
            self.cursor = self.len();
            return;
        }
        self.cursor = starts[line + 1] + col.min(self.line_len(line + 1));
    }

    /// Zero-based (line, column) of the cursor.
    pub(super) fn line_col(&self) -> (usize, usize) {
        let mut line = 0;
        let mut col = 0;
        for ch in self.text.chars().take(self.cursor) {
            if ch == '\n' {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn line_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];
        for (index, ch) in self.text.chars().enumerate() {
            if ch == '\n' {
                starts.push(index + 1);
            }
        }
        starts
    }

    fn line_len(&self, line: usize) -> usize {
        self.text
            .split('\n')
            .nth(line)
            .map_or(0, |text| text.chars().count())
    }

    fn split_at_cursor(&self) -> (String, String) {
        let mut left = String::new();
        let mut right = String::new();
        for (index, ch) in self.text.chars().enumerate() {
            if index < self.cursor {
                left.push(ch);
            } else {
                right.push(ch);
            }
        }
        (left, right)
    }

    fn remove_at(&mut self, target: usize) {
        self.text = self
            .text
            .chars()
            .enumerate()
            .filter(|(index, _)| *index != target)
            .map(|(_, ch)| ch)
            .collect();
    }
}
