//! Storage adapters for the link registry.
//!
//! - [`JsonFileStore`] - Pretty-printed JSON array in a single file
//! - [`MemoryStore`] - Process-local storage for tests and ephemeral runs

pub mod json_file_store;
pub mod memory_store;

pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
