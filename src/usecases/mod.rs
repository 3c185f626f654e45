//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement the
//! catalog's consistency contract.
//!
//! Use cases:
//! - `CollectionManager`: Canonical in-memory collection kept in step with the store
//! - `SeedLoader`: One-time example data on first run

pub mod collection_manager;
pub mod seed_loader;

pub use collection_manager::{CollectionError, CollectionManager, StoreKeys};
pub use seed_loader::{SeedLoader, SeedOutcome};
