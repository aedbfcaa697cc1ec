//! Key-value store port.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Asynchronous key-value persistence with whole-value replace semantics.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replaces the value stored under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<()>;
}
