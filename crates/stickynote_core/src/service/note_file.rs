//! Note file read/write at the file-dialog boundary.
//!
//! # Responsibility
//! - Pick the persistence format from the chosen path's extension.
//! - Read/write whole note files through the codec.
//!
//! # Invariants
//! - `.json` (case-insensitive) selects JSON; every other path is text.
//! - Reads never partially apply: callers get all lines or an error.

use crate::codec::{decode, encode, DecodeError, PersistFormat};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// File-level failure for explicit save/open.
#[derive(Debug)]
pub enum NoteFileError {
    Io { path: PathBuf, source: std::io::Error },
    Decode { path: PathBuf, source: DecodeError },
}

impl Display for NoteFileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Decode { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl Error for NoteFileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
        }
    }
}

/// Format selected by file extension.
pub fn format_for_path(path: &Path) -> PersistFormat {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        PersistFormat::Json
    } else {
        PersistFormat::Text
    }
}

/// Writes `lines` to `path`, replacing any existing file.
pub fn write_note_file<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<(), NoteFileError> {
    let format = format_for_path(path);
    let payload = encode(lines, format);
    match std::fs::write(path, payload) {
        Ok(()) => {
            info!(
                "event=note_file_write module=note_file status=ok format={} lines={}",
                format.as_str(),
                lines.len()
            );
            Ok(())
        }
        Err(source) => {
            warn!(
                "event=note_file_write module=note_file status=error format={} error={}",
                format.as_str(),
                source
            );
            Err(NoteFileError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Reads and decodes the note file at `path`.
pub fn read_note_file(path: &Path) -> Result<Vec<String>, NoteFileError> {
    let format = format_for_path(path);
    let payload = std::fs::read(path).map_err(|source| {
        warn!(
            "event=note_file_read module=note_file status=error error_code=read_failed format={}",
            format.as_str()
        );
        NoteFileError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let lines = decode(&payload, format).map_err(|source| {
        warn!(
            "event=note_file_read module=note_file status=error error_code=decode_failed format={}",
            format.as_str()
        );
        NoteFileError::Decode {
            path: path.to_path_buf(),
            source,
        }
    })?;

    info!(
        "event=note_file_read module=note_file status=ok format={} lines={}",
        format.as_str(),
        lines.len()
    );
    Ok(lines)
}
