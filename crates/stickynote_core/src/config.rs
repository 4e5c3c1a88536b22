//! Note appearance and limit settings.
//!
//! # Responsibility
//! - Provide the built-in defaults for every note window.
//! - Load optional overrides from `settings.toml` in the resource directory.
//!
//! # Invariants
//! - A `NoteConfig` handed to services has passed `validate()`.
//! - The palette is never empty and `max_chars >= 1`.

use crate::model::color::Color;
use log::{info, warn};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const DEFAULT_WIDTH: u32 = 240;
pub const DEFAULT_HEIGHT: u32 = 280;
pub const DEFAULT_MAX_CHARS: usize = 18;
pub const DEFAULT_FONT_NAME: &str = "Sticky Notes";
pub const DEFAULT_FONT_SIZE: u32 = 40;
pub const DEFAULT_OPACITY: f32 = 0.99;

const DEFAULT_PALETTE: [Color; 8] = [
    Color::rgb(0xFF, 0x6F, 0xAD),
    Color::rgb(0xE9, 0x80, 0x6A),
    Color::rgb(0xF8, 0x9C, 0x1D),
    Color::rgb(0xC7, 0xEC, 0x51),
    Color::rgb(0x8B, 0xC6, 0xC4),
    Color::rgb(0x2F, 0xC8, 0xF2),
    Color::rgb(0x6C, 0x34, 0x99),
    Color::rgb(0xFC, 0xFF, 0x9C),
];

/// Immutable settings shared by all notes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoteConfig {
    pub width: u32,
    pub height: u32,
    /// Per-line character cap.
    pub max_chars: usize,
    pub font_name: String,
    pub font_size: u32,
    /// Window opacity in `(0, 1]`.
    pub opacity: f32,
    pub colors: Vec<Color>,
    /// Upper bound on concurrently open secondary notes. `None` is unbounded.
    pub max_secondary_notes: Option<usize>,
}

impl Default for NoteConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_chars: DEFAULT_MAX_CHARS,
            font_name: DEFAULT_FONT_NAME.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            opacity: DEFAULT_OPACITY,
            colors: DEFAULT_PALETTE.to_vec(),
            max_secondary_notes: None,
        }
    }
}

/// Settings load/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    EmptyPalette,
    ZeroMaxChars,
    InvalidSize { width: u32, height: u32 },
    InvalidOpacity(f32),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read settings: {err}"),
            Self::Parse(err) => write!(f, "failed to parse settings: {err}"),
            Self::EmptyPalette => write!(f, "color palette must not be empty"),
            Self::ZeroMaxChars => write!(f, "max_chars must be at least 1"),
            Self::InvalidSize { width, height } => {
                write!(f, "note size must be non-zero, got {width}x{height}")
            }
            Self::InvalidOpacity(value) => {
                write!(f, "opacity must be in (0, 1], got {value}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl NoteConfig {
    /// Checks structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if self.max_chars == 0 {
            return Err(ConfigError::ZeroMaxChars);
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.opacity > 0.0 && self.opacity <= 1.0) {
            return Err(ConfigError::InvalidOpacity(self.opacity));
        }
        Ok(())
    }

    /// Parses TOML settings; absent keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads settings from `path`, falling back to defaults when the file
    /// does not exist.
    ///
    /// # Errors
    /// - `Io` when the file exists but cannot be read.
    /// - `Parse` or a validation variant when its content is invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("event=settings_load module=config status=default reason=missing");
                return Ok(Self::default());
            }
            Err(err) => {
                warn!("event=settings_load module=config status=error error_code=read_failed");
                return Err(ConfigError::Io(err));
            }
        };

        let config = Self::from_toml_str(&source).inspect_err(|err| {
            warn!("event=settings_load module=config status=error error={err}");
        })?;
        info!(
            "event=settings_load module=config status=ok palette_size={} max_chars={}",
            config.colors.len(),
            config.max_chars
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, NoteConfig, DEFAULT_MAX_CHARS};
    use crate::model::color::Color;

    #[test]
    fn defaults_are_valid() {
        let config = NoteConfig::default();
        config.validate().expect("defaults should validate");
        assert_eq!(config.colors.len(), 8);
        assert_eq!(config.max_chars, DEFAULT_MAX_CHARS);
        assert_eq!(config.max_secondary_notes, None);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = NoteConfig::from_toml_str(
            "max_chars = 10\nmax_secondary_notes = 3\ncolors = [\"#000000\", \"#FFFFFF\"]\n",
        )
        .expect("settings should parse");
        assert_eq!(config.max_chars, 10);
        assert_eq!(config.max_secondary_notes, Some(3));
        assert_eq!(config.colors, vec![Color::BLACK, Color::rgb(255, 255, 255)]);
        assert_eq!(config.width, 240);
    }

    #[test]
    fn empty_palette_is_rejected() {
        let err = NoteConfig::from_toml_str("colors = []").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPalette));
    }

    #[test]
    fn unknown_keys_and_bad_colors_fail_to_parse() {
        assert!(matches!(
            NoteConfig::from_toml_str("colour = 1").unwrap_err(),
            ConfigError::Parse(_)
        ));
        assert!(matches!(
            NoteConfig::from_toml_str("colors = [\"red\"]").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }

    #[test]
    fn opacity_out_of_range_is_rejected() {
        let err = NoteConfig::from_toml_str("opacity = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOpacity(_)));
    }

    #[test]
    fn missing_settings_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = NoteConfig::load_or_default(dir.path().join("settings.toml"))
            .expect("missing file should fall back to defaults");
        assert_eq!(config, NoteConfig::default());
    }

    #[test]
    fn settings_file_is_loaded_and_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        std::fs::write(&path, "max_chars = 12\n").unwrap();
        assert_eq!(NoteConfig::load_or_default(&path).unwrap().max_chars, 12);

        std::fs::write(&path, "max_chars = [").unwrap();
        assert!(matches!(
            NoteConfig::load_or_default(&path).unwrap_err(),
            ConfigError::Parse(_)
        ));

        std::fs::write(&path, "colors = []\n").unwrap();
        assert!(matches!(
            NoteConfig::load_or_default(&path).unwrap_err(),
            ConfigError::EmptyPalette
        ));
    }

    #[test]
    fn unreadable_settings_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = NoteConfig::load_or_default(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
