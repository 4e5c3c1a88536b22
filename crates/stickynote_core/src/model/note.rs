//! Note domain model.
//!
//! # Responsibility
//! - Hold the six editable line slots of one note.
//! - Enforce the per-line character cap on every write path.
//! - Carry per-note presentation state (background color, rare flag).
//!
//! # Invariants
//! - `NoteContent` always holds exactly `NOTE_LINE_COUNT` slots.
//! - No slot ever exceeds `max_chars` characters (counted as `char`s).
//! - Content returned to callers is an owned copy.

use crate::model::color::Color;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Number of line slots in every note.
pub const NOTE_LINE_COUNT: usize = 6;

/// Stable identifier of one open note.
pub type NoteId = Uuid;

/// Note state contract violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteError {
    /// Line index outside `[0, NOTE_LINE_COUNT)`.
    IndexOutOfRange(usize),
}

impl Display for NoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange(index) => write!(
                f,
                "line index {index} out of range; notes have {NOTE_LINE_COUNT} lines"
            ),
        }
    }
}

impl Error for NoteError {}

/// Six capped line slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteContent {
    lines: [String; NOTE_LINE_COUNT],
    max_chars: usize,
}

impl NoteContent {
    /// Creates empty content with the given per-line cap.
    ///
    /// A cap of zero is raised to one.
    pub fn new(max_chars: usize) -> Self {
        Self {
            lines: Default::default(),
            max_chars: max_chars.max(1),
        }
    }

    /// Creates content and loads `lines` with `load_content` semantics.
    pub fn with_lines<S: AsRef<str>>(max_chars: usize, lines: &[S]) -> Self {
        let mut content = Self::new(max_chars);
        content.load_content(lines);
        content
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Writes one slot, silently clamping `text` to the character cap.
    ///
    /// # Errors
    /// - `IndexOutOfRange` when `index >= NOTE_LINE_COUNT`.
    pub fn set_line(&mut self, index: usize, text: &str) -> Result<(), NoteError> {
        let max_chars = self.max_chars;
        let slot = self
            .lines
            .get_mut(index)
            .ok_or(NoteError::IndexOutOfRange(index))?;
        *slot = clamp_chars(text, max_chars);
        Ok(())
    }

    /// Reads one slot.
    pub fn line(&self, index: usize) -> Result<&str, NoteError> {
        self.lines
            .get(index)
            .map(String::as_str)
            .ok_or(NoteError::IndexOutOfRange(index))
    }

    /// Returns a copy of all six slots.
    pub fn get_content(&self) -> Vec<String> {
        self.lines.to_vec()
    }

    /// Borrowed view of all six slots.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Replaces every slot.
    ///
    /// Missing entries become empty, extra entries are dropped, and each kept
    /// entry is whitespace-trimmed then clamped.
    pub fn load_content<S: AsRef<str>>(&mut self, lines: &[S]) {
        let max_chars = self.max_chars;
        for (index, slot) in self.lines.iter_mut().enumerate() {
            *slot = lines
                .get(index)
                .map(|line| clamp_chars(line.as_ref().trim(), max_chars))
                .unwrap_or_default();
        }
    }

    /// Lines as written to disk: trailing empty slots are omitted.
    pub fn to_persisted(&self) -> Vec<String> {
        let used = self
            .lines
            .iter()
            .rposition(|line| !line.is_empty())
            .map_or(0, |last| last + 1);
        self.lines[..used].to_vec()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(String::is_empty)
    }
}

/// Truncates `text` to at most `max_chars` characters.
pub fn clamp_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// One open note: identity, content and presentation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickyNote {
    id: NoteId,
    pub content: NoteContent,
    color: Color,
    rare: bool,
}

impl StickyNote {
    pub fn new(max_chars: usize, color: Color) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: NoteContent::new(max_chars),
            color,
            rare: false,
        }
    }

    /// Rare variant: black background, color cycling enabled.
    pub fn new_rare(max_chars: usize) -> Self {
        Self {
            rare: true,
            ..Self::new(max_chars, Color::BLACK)
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn is_rare(&self) -> bool {
        self.rare
    }
}
