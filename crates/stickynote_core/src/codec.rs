//! Persistence codec for note line content.
//!
//! # Responsibility
//! - Encode a line sequence as plain text or as a JSON document.
//! - Decode either representation back into a line sequence.
//!
//! # Invariants
//! - Text payloads are `\n`-joined with no trailing newline.
//! - JSON payloads are a single object `{"content": [..]}`.
//! - Decoding never touches note state; callers apply the result.
//!
//! Choosing a format from a file extension is a file-boundary concern and
//! lives in `service::note_file`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// On-disk representation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistFormat {
    Text,
    Json,
}

impl PersistFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

/// JSON document shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedNote {
    pub content: Vec<String>,
}

/// Payload does not match the requested format.
#[derive(Debug)]
pub enum DecodeError {
    /// Text payload is not valid UTF-8.
    InvalidUtf8(std::str::Utf8Error),
    /// Payload is not valid JSON.
    InvalidJson(serde_json::Error),
    /// Payload is valid JSON but not an object.
    NotAnObject,
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUtf8(err) => write!(f, "note file is not valid UTF-8 text: {err}"),
            Self::InvalidJson(err) => write!(f, "note file is not valid JSON: {err}"),
            Self::NotAnObject => write!(f, "note file JSON must be an object"),
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidUtf8(err) => Some(err),
            Self::InvalidJson(err) => Some(err),
            Self::NotAnObject => None,
        }
    }
}

/// Encodes lines in the given format.
pub fn encode<S: AsRef<str>>(lines: &[S], format: PersistFormat) -> String {
    match format {
        PersistFormat::Text => lines
            .iter()
            .map(|line| line.as_ref())
            .collect::<Vec<&str>>()
            .join("\n"),
        PersistFormat::Json => {
            let document = PersistedNote {
                content: lines.iter().map(|line| line.as_ref().to_string()).collect(),
            };
            // A struct of strings always serializes.
            serde_json::to_string(&document).unwrap_or_else(|_| String::from(r#"{"content":[]}"#))
        }
    }
}

/// Decodes a payload in the given format.
///
/// # Errors
/// - `InvalidUtf8` when the payload is not text.
/// - `InvalidJson` / `NotAnObject` for JSON payloads that are not a document
///   object. A missing or non-string-array `content` field yields an empty
///   sequence instead.
pub fn decode(payload: &[u8], format: PersistFormat) -> Result<Vec<String>, DecodeError> {
    match format {
        PersistFormat::Text => {
            let text = std::str::from_utf8(payload).map_err(DecodeError::InvalidUtf8)?;
            Ok(decode_text(text))
        }
        PersistFormat::Json => decode_json(payload),
    }
}

fn decode_text(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

fn decode_json(payload: &[u8]) -> Result<Vec<String>, DecodeError> {
    let value: serde_json::Value =
        serde_json::from_slice(payload).map_err(DecodeError::InvalidJson)?;
    let object = value.as_object().ok_or(DecodeError::NotAnObject)?;

    let lines = object
        .get("content")
        .and_then(|content| serde_json::from_value::<Vec<String>>(content.clone()).ok())
        .unwrap_or_default();
    Ok(lines)
}
