//! Presentation seam between note state and a widget toolkit.
//!
//! The core never touches widgets. A toolkit adapter implements
//! `NoteRenderer` and is driven by `StickyNotesApp`.

use crate::model::note::{NoteId, StickyNote};

/// Modal message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// Capability interface implemented by a toolkit adapter.
pub trait NoteRenderer {
    /// Draws or refreshes a note window (lines and background color).
    fn render(&mut self, note: &StickyNote);

    /// Tears down the window of a closed note.
    fn dispose(&mut self, id: NoteId);

    /// Shows a single blocking acknowledgment to the user.
    fn show_message(&mut self, kind: MessageKind, title: &str, body: &str);
}
