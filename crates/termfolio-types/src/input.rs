//! Platform-agnostic input events for the prompt.
//!
//! Every host maps its native keyboard input to these enums. The REPL state
//! machine never sees raw key codes.

use serde::{Deserialize, Serialize};

/// A discrete input event delivered to the REPL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Character typed at the end of the input line.
    TextInput(char),
    /// Backspace / delete-left.
    Backspace,
    /// The whole input line was replaced (paste, host-side editing).
    SetText(String),
    /// A control key was pressed.
    Key(Key),
}

/// Control keys the prompt reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Submit the current line.
    Enter,
    /// Recall an older history entry.
    Up,
    /// Recall a newer history entry.
    Down,
    /// Accept the first completion suggestion.
    Tab,
}
