//! Seed Loader Use Case - First-Run Example Data
//!
//! Writes the default collection into an empty store the first time
//! the application runs. Seeding is keyed on "has ever been checked":
//! once the marker key exists the loader never writes again, even if
//! the collection was later cleared.
//!
//! Seeding flow:
//! 1. Marker present → no-op
//! 2. Read the stored collection (absent or unparsable counts as empty)
//! 3. Empty → write the defaults
//! 4. Write the marker

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::domain::collection::{decode_collection, encode_collection};
use crate::domain::wine::WineRecord;
use crate::ports::store::KeyValueStore;

/// What `ensure_seeded` found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
  /// The store was empty; the defaults were written.
  Seeded { count: usize },
  /// The store already held records; nothing was written but the marker.
  AlreadyPopulated { count: usize },
  /// The marker was present; nothing was read or written.
  PreviouslySeeded,
}

/// Ensures the store holds the example collection exactly once.
pub struct SeedLoader<S: KeyValueStore> {
  store: Arc<S>,
  collection_key: String,
  marker_key: String,
}

impl<S: KeyValueStore> SeedLoader<S> {
  /// Create a loader over `store` using the given keys.
  pub fn new(
    store: Arc<S>,
    collection_key: impl Into<String>,
    marker_key: impl Into<String>,
  ) -> Self {
    Self {
      store,
      collection_key: collection_key.into(),
      marker_key: marker_key.into(),
    }
  }

  /// Write `defaults` if this store has never been seeded and is empty.
  ///
  /// # Errors
  /// Returns an error if any store read or write fails. The collection
  /// may then legitimately remain empty; the next call retries.
  #[instrument(skip(self, defaults), fields(defaults = defaults.len()))]
  pub async fn ensure_seeded(&self, defaults: &[WineRecord]) -> Result<SeedOutcome> {
    let marker = self
      .store
      .get(&self.marker_key)
      .await
      .context("Failed to read seed marker")?;

    if marker.is_some() {
      debug!("Seed marker present, skipping");
      return Ok(SeedOutcome::PreviouslySeeded);
    }

    let existing = self
      .store
      .get(&self.collection_key)
      .await
      .context("Failed to read collection before seeding")?;

    let existing_count = match existing.as_deref().map(decode_collection) {
      None => 0,
      Some(Ok(wines)) => wines.len(),
      Some(Err(e)) => {
        warn!(error = %e, "Stored collection unreadable, treating as empty");
        0
      }
    };

    let outcome = if existing_count == 0 {
      let json = encode_collection(defaults)?;
      self
        .store
        .set(&self.collection_key, &json)
        .await
        .context("Failed to write seed collection")?;

      info!(count = defaults.len(), "Store seeded with example collection");
      SeedOutcome::Seeded { count: defaults.len() }
    } else {
      debug!(count = existing_count, "Store already populated, not seeding");
      SeedOutcome::AlreadyPopulated { count: existing_count }
    };

    self
      .store
      .set(&self.marker_key, &Utc::now().to_rfc3339())
      .await
      .context("Failed to write seed marker")?;

    Ok(outcome)
  }
}
