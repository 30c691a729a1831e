//! TUI event loop for the lab console.

use super::app::{Action, App};
use super::terminal::TerminalGuard;
use super::EVENT_POLL_MS;
use crate::lab::Console;
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use std::io;
use std::time::Duration;

pub(super) fn run_tui(console: Console) -> Result<()> {
    let mut app = App::new(console);

    let mut guard = TerminalGuard::enter()?;
    let mut terminal = {
        let stdout = io::stdout();
        let backend = CrosstermBackend::new(stdout);
        ratatui::Terminal::new(backend).context("init terminal")?
    };

    while !app.should_quit() {
        terminal
            .draw(|frame| app.draw(frame))
            .context("draw lab ui")?;

        if event::poll(Duration::from_millis(EVENT_POLL_MS)).context("poll event")? {
            if let Event::Key(key) = event::read().context("read event")? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(action) = action_from_key(key, app.is_editing()) {
                    app.apply(action);
                }
            }
        }
    }

    guard.restore();
    terminal.show_cursor().ok();
    tracing::info!(
        scenario = %app.console.scenario().id,
        validation = app.console.validation().as_str(),
        "lab session closed"
    );
    Ok(())
}

fn action_from_key(key: KeyEvent, editing: bool) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('s') if editing => Some(Action::Save),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Enter => Some(Action::Enter),
        KeyCode::Char(ch) => Some(Action::Insert(ch)),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Delete => Some(Action::Delete),
        KeyCode::Left => Some(Action::Left),
        KeyCode::Right => Some(Action::Right),
        KeyCode::Home => Some(Action::Home),
        KeyCode::End => Some(Action::End),
        KeyCode::Up => Some(Action::Up),
        KeyCode::Down => Some(Action::Down),
        KeyCode::Tab if editing => Some(Action::Indent),
        KeyCode::Esc if editing => Some(Action::Cancel),
        KeyCode::PageUp if !editing => Some(Action::PageUp),
        KeyCode::PageDown if !editing => Some(Action::PageDown),
        KeyCode::F(2) if !editing => Some(Action::Validate),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn key_mapping() {
        assert_eq!(action_from_key(ctrl('c'), false), Some(Action::Quit));
        assert_eq!(action_from_key(ctrl('q'), true), Some(Action::Quit));
        assert_eq!(action_from_key(key(KeyCode::Char('q')), false), Some(Action::Insert('q')));
        assert_eq!(action_from_key(key(KeyCode::F(2)), false), Some(Action::Validate));
        assert_eq!(action_from_key(key(KeyCode::PageUp), false), Some(Action::PageUp));
        assert_eq!(action_from_key(key(KeyCode::Tab), false), None);
        assert_eq!(action_from_key(key(KeyCode::Esc), false), None);
        assert_eq!(action_from_key(ctrl('s'), false), None);
    }

    #[test]
    fn editor_key_mapping() {
        assert_eq!(action_from_key(ctrl('s'), true), Some(Action::Save));
        assert_eq!(action_from_key(key(KeyCode::Esc), true), Some(Action::Cancel));
        assert_eq!(action_from_key(key(KeyCode::Tab), true), Some(Action::Indent));
        assert_eq!(action_from_key(key(KeyCode::Enter), true), Some(Action::Enter));
        assert_eq!(action_from_key(key(KeyCode::F(2)), true), None);
    }
}
