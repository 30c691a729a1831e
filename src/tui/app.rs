use super::buffer::TextBuffer;
use crate::lab::Console;

const EDITOR_INDENT: &str = "  ";

/// Key-level intent, independent of the terminal library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Action {
    Quit,
    Enter,
    Insert(char),
    Indent,
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Up,
    Down,
    PageUp,
    PageDown,
    Validate,
    Save,
    Cancel,
}

pub(super) struct App {
    pub(super) console: Console,
    pub(super) input: TextBuffer,
    /// Open editor modal, mirroring the console's editor session.
    pub(super) editor: Option<TextBuffer>,
    /// Transcript lines scrolled back from the latest entry; 0 follows output.
    pub(super) scroll_back: usize,
    /// Id of the newest transcript entry at the last draw.
    pub(super) followed: Option<u64>,
    quit: bool,
}

impl App {
    pub(super) fn new(console: Console) -> Self {
        Self {
            console,
            input: TextBuffer::default(),
            editor: None,
            scroll_back: 0,
            followed: None,
            quit: false,
        }
    }

    pub(super) fn should_quit(&self) -> bool {
        self.quit
    }

    pub(super) fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    pub(super) fn apply(&mut self, action: Action) {
        if action == Action::Quit {
            self.quit = true;
            return;
        }
        if self.editor.is_some() {
            self.apply_editor(action);
        } else {
            self.apply_input(action);
        }
    }

    fn apply_input(&mut self, action: Action) {
        match action {
            Action::Enter => self.submit(),
            Action::Insert(ch) => self.input.insert(ch.encode_utf8(&mut [0; 4])),
            Action::Backspace => self.input.backspace(),
            Action::Delete => self.input.delete(),
            Action::Left => self.input.left(),
            Action::Right => self.input.right(),
            Action::Home => self.input.home(),
            Action::End => self.input.end(),
            Action::Up => {
                if let Some(text) = self.console.history_up() {
                    self.input.set(text);
                }
            }
            Action::Down => {
                if let Some(text) = self.console.history_down() {
                    self.input.set(text);
                }
            }
            Action::PageUp => self.scroll_back = self.scroll_back.saturating_add(10),
            Action::PageDown => self.scroll_back = self.scroll_back.saturating_sub(10),
            Action::Validate => {
                self.console.validate();
                self.scroll_back = 0;
            }
            Action::Indent | Action::Save | Action::Cancel | Action::Quit => {}
        }
    }

    fn apply_editor(&mut self, action: Action) {
        let Some(buffer) = self.editor.as_mut() else {
            return;
        };
        match action {
            Action::Enter => buffer.insert("\n"),
            Action::Insert(ch) => buffer.insert(ch.encode_utf8(&mut [0; 4])),
            Action::Indent => buffer.insert(EDITOR_INDENT),
            Action::Backspace => buffer.backspace(),
            Action::Delete => buffer.delete(),
            Action::Left => buffer.left(),
            Action::Right => buffer.right(),
            Action::Home => buffer.home(),
            Action::End => buffer.end(),
            Action::Up => buffer.up(),
            Action::Down => buffer.down(),
            Action::Save => self.save(),
            Action::Cancel => {
                self.editor = None;
                self.console.cancel_editor();
            }
            Action::PageUp | Action::PageDown | Action::Validate | Action::Quit => {}
        }
    }

    fn submit(&mut self) {
        let line = self.input.take();
        self.console.submit(&line);
        self.scroll_back = 0;
        self.editor = self
            .console
            .editor()
            .map(|session| TextBuffer::new(session.draft.clone()));
    }

    fn save(&mut self) {
        let Some(buffer) = self.editor.take() else {
            return;
        };
        let saved = self
            .console
            .set_draft(buffer.text())
            .and_then(|()| self.console.save_editor());
        if let Err(err) = saved {
            tracing::debug!(error = %err, "save rejected");
        }
        self.scroll_back = 0;
    }
}
