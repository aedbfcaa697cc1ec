//! Infrastructure layer for TabMind.
//!
//! Concrete adapters for the core ports: file and memory stores, the
//! broadcast channel, an in-memory tab host, and backends for hosts without
//! on-device AI. Also owns configuration loading and path resolution.

pub mod backends;
pub mod broadcast;
pub mod config_service;
pub mod paths;
pub mod storage;
pub mod tab_host;

pub use backends::{UnavailableLanguageModel, UnavailableSummarizer};
pub use broadcast::ChannelBroadcaster;
pub use config_service::ConfigService;
pub use paths::TabMindPaths;
pub use storage::{JsonFileStore, MemoryStore};
pub use tab_host::{InMemoryTabHost, TabFixture};
