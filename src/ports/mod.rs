//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `KeyValueStore`: Durable on-device text blob storage

pub mod store;

pub use store::KeyValueStore;
