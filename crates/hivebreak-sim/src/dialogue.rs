//! Dialogue state: cycling NPC scripts and the active dialogue box.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for dialogue operations.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// No dialogue is currently open
    #[error("No active dialogue")]
    NoActiveDialogue,
}

/// Result type for dialogue operations.
pub type DialogueResult<T> = Result<T, DialogueError>;

/// What kind of line is being delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    /// Regular cycling dialogue
    Dialogue,
    /// A one-shot quest briefing
    Quest,
}

/// One delivered line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// Who is speaking
    pub speaker: String,
    /// The text of the line
    pub text: String,
    /// Kind of line
    pub kind: LineKind,
}

/// An NPC's dialogue script: an ordered list of lines, delivered cyclically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueScript {
    lines: Vec<String>,
    index: usize,
}

impl DialogueScript {
    /// Creates a script from its lines.
    #[must_use]
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines, index: 0 }
    }

    /// Whether the script has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Delivers the next line, cycling back to the start after the last.
    pub fn next_line(&mut self) -> String {
        if self.lines.is_empty() {
            return String::from("...");
        }
        let line = self.lines[self.index].clone();
        self.index = (self.index + 1) % self.lines.len();
        line
    }
}

/// The session's single dialogue box.
///
/// While a line is open, player combat input is suppressed; interacting again
/// closes it.
#[derive(Debug, Clone, Default)]
pub struct DialogueBox {
    current: Option<DialogueLine>,
}

impl DialogueBox {
    /// Creates a closed dialogue box.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a line is currently open.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// The open line, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&DialogueLine> {
        self.current.as_ref()
    }

    /// Opens a line, replacing any previous one.
    pub fn open(&mut self, line: DialogueLine) {
        tracing::debug!(speaker = %line.speaker, "dialogue opened");
        self.current = Some(line);
    }

    /// Closes the open line, returning it.
    pub fn close(&mut self) -> DialogueResult<DialogueLine> {
        self.current.take().ok_or(DialogueError::NoActiveDialogue)
    }
}
