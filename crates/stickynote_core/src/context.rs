//! Application context: resource locations resolved once at startup.
//!
//! # Responsibility
//! - Decide the resource directory for the running process.
//! - Derive well-known file locations (auto-save, settings, logs) from it.
//!
//! # Invariants
//! - The resource directory is absolute.
//! - Components receive paths from an `AppContext`; nothing reads process
//!   globals after startup.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the resource directory.
pub const RESOURCE_DIR_ENV: &str = "STICKYNOTE_HOME";

const AUTO_SAVE_FILE_NAME: &str = "auto_save.json";
const SETTINGS_FILE_NAME: &str = "settings.toml";
const LOG_DIR_NAME: &str = "logs";

/// Resource directory resolution errors.
#[derive(Debug)]
pub enum ContextError {
    NotAbsolute(PathBuf),
    CurrentExe(std::io::Error),
    NoParent(PathBuf),
}

impl Display for ContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAbsolute(path) => write!(
                f,
                "resource directory must be an absolute path, got `{}`",
                path.display()
            ),
            Self::CurrentExe(err) => write!(f, "failed to locate executable: {err}"),
            Self::NoParent(path) => {
                write!(f, "executable `{}` has no parent directory", path.display())
            }
        }
    }
}

impl Error for ContextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentExe(err) => Some(err),
            _ => None,
        }
    }
}

/// Resource locations for one running process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppContext {
    resource_dir: PathBuf,
}

impl AppContext {
    /// Creates a context rooted at an explicit directory.
    pub fn new(resource_dir: impl Into<PathBuf>) -> Result<Self, ContextError> {
        let resource_dir = resource_dir.into();
        if !resource_dir.is_absolute() {
            return Err(ContextError::NotAbsolute(resource_dir));
        }
        Ok(Self { resource_dir })
    }

    /// Resolves the resource directory from `STICKYNOTE_HOME`, falling back
    /// to the directory containing the executable.
    pub fn discover() -> Result<Self, ContextError> {
        if let Some(dir) = std::env::var_os(RESOURCE_DIR_ENV).filter(|value| !value.is_empty()) {
            return Self::new(PathBuf::from(dir));
        }

        let exe = std::env::current_exe().map_err(ContextError::CurrentExe)?;
        let dir = exe
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| ContextError::NoParent(exe.clone()))?;
        Self::new(dir)
    }

    pub fn resource_dir(&self) -> &Path {
        &self.resource_dir
    }

    /// Fixed location of the primary note's auto-save file.
    pub fn auto_save_path(&self) -> PathBuf {
        self.resource_dir.join(AUTO_SAVE_FILE_NAME)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.resource_dir.join(SETTINGS_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.resource_dir.join(LOG_DIR_NAME)
    }
}
