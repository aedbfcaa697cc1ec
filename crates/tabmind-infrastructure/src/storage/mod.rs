//! Key-value store adapters.

pub mod atomic_file;
pub mod json_file_store;
pub mod memory_store;

pub use atomic_file::AtomicFile;
pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
