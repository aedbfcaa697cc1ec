//! Path management for TabMind files.
//!
//! ```text
//! ~/.config/tabmind/          # Default base directory
//! ├── config.toml             # TabMindConfig
//! └── storage.json            # Key-value store (workspace state)
//! ```

use std::path::{Path, PathBuf};

use tabmind_core::error::{Result, TabMindError};

const APP_DIR: &str = "tabmind";

/// Resolves TabMind file locations under one base directory.
///
/// The base defaults to the platform config directory; tests and the CLI can
/// point it anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabMindPaths {
    base: PathBuf,
}

impl TabMindPaths {
    /// Uses `base_override` when given, the platform config directory
    /// otherwise.
    pub fn new(base_override: Option<&Path>) -> Result<Self> {
        let base = match base_override {
            Some(base) => base.to_path_buf(),
            None => dirs::config_dir()
                .ok_or_else(|| TabMindError::config("Cannot determine the config directory"))?
                .join(APP_DIR),
        };
        Ok(Self { base })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn config_file(&self) -> PathBuf {
        self.base.join("config.toml")
    }

    pub fn storage_file(&self) -> PathBuf {
        self.base.join("storage.json")
    }
}
