//! Unified path management for postbox files.
//!
//! All on-device files live in one config directory so a single override
//! (tests, `--state-dir`) relocates everything.

use postbox_core::PostboxError;
use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for PostboxError {
    fn from(err: PathError) -> Self {
        PostboxError::config(err.to_string())
    }
}

/// Path resolution for postbox.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/postbox/           # Config directory (platform default)
/// ├── config.toml              # Client configuration
/// └── state.json               # Persisted theme and session
/// ```
#[derive(Debug, Clone, Default)]
pub struct PostboxPaths {
    base_dir: Option<PathBuf>,
}

impl PostboxPaths {
    const APP_DIR: &'static str = "postbox";

    /// Creates a resolver. `base_dir` replaces the platform config directory.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Returns the postbox configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: The override, or e.g. `~/.config/postbox/`
    /// - `Err(PathError::ConfigDirNotFound)`: No platform config directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base_dir {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to `state.json`, the persisted key-value document.
    pub fn state_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("state.json"))
    }
}
