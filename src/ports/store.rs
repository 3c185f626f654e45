//! Durable Store Port - Key to Text Blob Persistence Interface
//!
//! Defines the trait the collection layer needs from the on-device
//! store. Values are opaque text blobs addressed by string keys.
//!
//! Contract:
//! - A `set` either fully replaces the value at `key` or leaves it
//!   untouched; it never partially applies
//! - `remove` of an absent key succeeds
//! - No atomic multi-key transaction is assumed

use async_trait::async_trait;

/// Trait for durable key/value storage providers.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
  /// Read the value at `key`. `Ok(None)` when the key is absent.
  async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

  /// Replace the value at `key`.
  async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

  /// Delete the value at `key`.
  async fn remove(&self, key: &str) -> anyhow::Result<()>;

  /// Check if the store is usable (directory present and writable).
  async fn is_healthy(&self) -> bool;
}
