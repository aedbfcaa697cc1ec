//! Loads `config.toml`, creating it with defaults on first use.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tabmind_core::config::TabMindConfig;
use tabmind_core::error::Result;

use crate::storage::AtomicFile;

/// Loads and caches the TabMind configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    file: AtomicFile,
    cached: Arc<RwLock<Option<TabMindConfig>>>,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicFile::new(path),
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, reading the file on first access.
    ///
    /// A missing file is created with the defaults. Missing fields in an
    /// existing file take their default values.
    pub fn load(&self) -> Result<TabMindConfig> {
        if let Ok(guard) = self.cached.read() {
            if let Some(config) = guard.as_ref() {
                return Ok(config.clone());
            }
        }

        let config = match self.file.read()? {
            Some(text) => TabMindConfig::from_toml_str(&text)?,
            None => {
                let config = TabMindConfig::default();
                self.file.write(&config.to_toml_string()?)?;
                tracing::info!(
                    "[ConfigService] Wrote default configuration to {}",
                    self.file.path().display()
                );
                config
            }
        };

        if let Ok(mut guard) = self.cached.write() {
            *guard = Some(config.clone());
        }
        Ok(config)
    }

    /// Forces the next [`load`](Self::load) to read the file again.
    pub fn invalidate_cache(&self) {
        if let Ok(mut guard) = self.cached.write() {
            *guard = None;
        }
    }
}
