//! Full-screen lab console.
//!
//! A thin shell over `lab::Console`: keys become actions, actions become
//! console calls, and every frame is redrawn from console state.
mod app;
mod buffer;
mod terminal;
mod ui;
mod view;

use crate::lab::Console;
use anyhow::Result;
use std::io::{self, IsTerminal};

const EVENT_POLL_MS: u64 = 200;

/// Whether both ends of the session are attached to a terminal.
pub fn is_interactive() -> bool {
    io::stdout().is_terminal() && io::stdin().is_terminal()
}

pub fn run(console: Console) -> Result<()> {
    ui::run_tui(console)
}
