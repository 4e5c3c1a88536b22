//! Best-effort auto-save of the primary note.
//!
//! # Responsibility
//! - Persist the primary note's lines as JSON to a fixed location.
//! - Restore those lines once at startup.
//!
//! # Invariants
//! - `persist` never returns an error; failures are logged and dropped.
//! - `restore` never fails; missing/unreadable/malformed files yield empty
//!   content.
//! - `restore` runs before any edit, so it never races `persist`.

use crate::codec::{decode, encode, PersistFormat};
use crate::model::note::NoteContent;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Auto-save file owner.
#[derive(Debug, Clone)]
pub struct AutoSaveService {
    path: PathBuf,
    max_chars: usize,
}

impl AutoSaveService {
    pub fn new(path: impl Into<PathBuf>, max_chars: usize) -> Self {
        Self {
            path: path.into(),
            max_chars,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `content` as JSON. Returns whether the write landed, for
    /// diagnostics only.
    pub fn persist(&self, content: &NoteContent) -> bool {
        let payload = encode(&content.to_persisted(), PersistFormat::Json);
        match std::fs::write(&self.path, payload) {
            Ok(()) => {
                info!("event=autosave_persist module=autosave status=ok");
                true
            }
            Err(err) => {
                warn!(
                    "event=autosave_persist module=autosave status=error error_code=write_failed error={}",
                    err
                );
                false
            }
        }
    }

    /// Reads the auto-save file into six normalized slots.
    pub fn restore(&self) -> NoteContent {
        let payload = match std::fs::read(&self.path) {
            Ok(payload) => payload,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("event=autosave_restore module=autosave status=skipped reason=missing");
                return NoteContent::new(self.max_chars);
            }
            Err(err) => {
                warn!(
                    "event=autosave_restore module=autosave status=error error_code=read_failed error={}",
                    err
                );
                return NoteContent::new(self.max_chars);
            }
        };

        match decode(&payload, PersistFormat::Json) {
            Ok(lines) => {
                info!(
                    "event=autosave_restore module=autosave status=ok lines={}",
                    lines.len()
                );
                NoteContent::with_lines(self.max_chars, &lines)
            }
            Err(err) => {
                warn!(
                    "event=autosave_restore module=autosave status=error error_code=decode_failed error={}",
                    err
                );
                NoteContent::new(self.max_chars)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AutoSaveService;
    use crate::model::note::NoteContent;

    #[test]
    fn persist_into_missing_directory_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let service = AutoSaveService::new(dir.path().join("missing/auto_save.json"), 18);
        let content = NoteContent::with_lines(18, &["x"]);
        assert!(!service.persist(&content));
        assert!(service.restore().is_empty());
    }

    #[test]
    fn persist_then_restore_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let service = AutoSaveService::new(dir.path().join("auto_save.json"), 18);
        let content = NoteContent::with_lines(18, &["buy", "", "call mom"]);
        assert!(service.persist(&content));
        assert_eq!(service.restore(), content);
    }
}
