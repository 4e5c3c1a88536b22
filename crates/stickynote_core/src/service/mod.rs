//! Note use-case services.
//!
//! # Responsibility
//! - Manage the set of open notes and their file save/open.
//! - Keep file-system details out of the model and the application shell.

pub mod autosave;
pub mod color_cycle;
pub mod note_file;
pub mod registry;
