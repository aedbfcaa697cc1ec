//! Key-value store persisted as one JSON object file.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;

use tabmind_core::error::{Result, TabMindError};
use tabmind_core::storage::KeyValueStore;

use super::atomic_file::AtomicFile;

/// Stores every key as a member of one JSON object on disk.
///
/// Each `set` is a locked read-modify-write of the whole file, replacing the
/// value under its key. File I/O runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    file: AtomicFile,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicFile::new(path),
        }
    }

    fn parse(content: Option<String>) -> Result<Map<String, Value>> {
        match content {
            None => Ok(Map::new()),
            Some(text) => match serde_json::from_str(&text)? {
                Value::Object(map) => Ok(map),
                _ => Err(TabMindError::data_access("store file does not hold a JSON object")),
            },
        }
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(AtomicFile) -> Result<T> + Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || f(file))
            .await
            .map_err(|e| TabMindError::internal(format!("store task failed: {}", e)))?
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let key = key.to_string();
        self.blocking(move |file| {
            let mut map = Self::parse(file.read()?)?;
            Ok(map.remove(&key))
        })
        .await
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let key = key.to_string();
        self.blocking(move |file| {
            file.update(|current| {
                let mut map = Self::parse(current)?;
                map.insert(key, value);
                Ok(serde_json::to_string_pretty(&Value::Object(map))?)
            })
        })
        .await?;
        tracing::debug!("[JsonFileStore] Wrote {}", self.file.path().display());
        Ok(())
    }
}
