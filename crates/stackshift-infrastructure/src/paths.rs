//! Path resolution for the stackshift configuration file.
//!
//! ```text
//! --config <path>                    # explicit flag, always wins
//! ./stackshift.toml                  # next to where the tool is run
//! ~/.config/stackshift/config.toml   # platform config directory
//! ```

use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "stackshift.toml";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform config directory could not be determined.
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

pub struct StackshiftPaths;

impl StackshiftPaths {
    /// Returns the stackshift configuration directory (e.g. `~/.config/stackshift/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("stackshift"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the user-level configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Picks the configuration file to load.
    ///
    /// The returned path may not exist when neither the local file nor the
    /// user-level file is present; callers then fall back to the environment.
    pub fn resolve_config_file(
        explicit: Option<&Path>,
        working_dir: &Path,
    ) -> Result<PathBuf, PathError> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }

        let local = working_dir.join(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Ok(local);
        }

        Self::config_file()
    }
}
