//! User settings stored in settings.yaml in the user config directory.

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// All fields are optional; command-line flags override them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Uploader executable
    pub uploader: Option<String>,
    /// Default log level
    pub log_level: Option<String>,
    /// Directory for rotated log files
    pub log_dir: Option<PathBuf>,
    /// Target catalog replacing the built-in one
    pub catalog: Option<PathBuf>,
}

/// Platform-specific configuration directory
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("symup")
}

pub fn settings_file_path() -> PathBuf {
    config_dir().join("settings.yaml")
}

/// Load a YAML file from disk
pub fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value = serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(value)
}

/// Load settings from `explicit`, or from the default location.
///
/// A missing default file yields defaults; an explicit path must exist.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<Settings> {
    match explicit {
        Some(path) => load_yaml(path),
        None => {
            let path = settings_file_path();
            if path.exists() {
                load_yaml(&path)
            } else {
                Ok(Settings::default())
            }
        }
    }
}
