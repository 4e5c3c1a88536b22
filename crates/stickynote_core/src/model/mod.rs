//! Sticky note domain model.
//!
//! # Responsibility
//! - Define the per-note state shared by every window.
//! - Keep presentation-only state (colors, sketch strokes) free of toolkit
//!   types.
//!
//! # Invariants
//! - Every note is identified by a `NoteId` that is never reused.

pub mod color;
pub mod drawing;
pub mod note;
