//! Event types for the TUI event loop.

use crate::commands::Outcome;
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
    /// A spawned command finished.
    Completed(Outcome),
}
