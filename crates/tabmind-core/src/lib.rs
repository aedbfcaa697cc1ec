//! Domain layer for TabMind.
//!
//! Holds the models shared by every crate (tabs, clusters, workspace state),
//! the configuration model, the shared error type and the port traits that
//! the application layer calls and the infrastructure layer implements.

pub mod ai;
pub mod cluster;
pub mod config;
pub mod content;
pub mod error;
pub mod storage;
pub mod tab;
pub mod workspace;

// Re-export common error type
pub use error::{Result, TabMindError};
