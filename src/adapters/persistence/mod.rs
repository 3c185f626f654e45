//! Persistence Adapters - On-Device Key/Value Storage
//!
//! Implements the `KeyValueStore` port with a directory of atomically
//! replaced JSON files, plus a volatile in-memory variant.
//! No database dependency — lightweight and crash-safe.

pub mod file_store;
pub mod memory_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
