//! Collection Manager Use Case - Canonical Wine Collection
//!
//! Owns the in-memory mirror of the stored collection and mediates
//! every read and mutation against the durable store. Once a mutation
//! returns `Ok`, every later read from any handle observes it.
//!
//! Mutation flow (add / update / delete):
//! 1. Wait for the mutation gate (FIFO, one operation at a time)
//! 2. Re-read the full persisted collection
//! 3. Apply the change to that fresh copy
//! 4. Write the full collection back
//! 5. On success, reload the mirror from the store and notify subscribers
//!
//! A failed write leaves both the store and the mirror untouched.
//! Mutations run on their own task, so a caller that drops the future
//! does not cut a store write short.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, instrument, warn};

use crate::domain::collection::{Collection, decode_collection, encode_collection, position_of};
use crate::domain::id::IdGenerator;
use crate::domain::wine::{WineDraft, WineId, WineRecord};
use crate::ports::store::KeyValueStore;

use super::seed_loader::SeedLoader;

/// Store keys used by the collection layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKeys {
  /// Key holding the serialized collection.
  pub collection: String,
  /// Key recording that first-run seeding has happened.
  pub seed_marker: String,
}

impl Default for StoreKeys {
  fn default() -> Self {
    Self {
      collection: "wines".to_string(),
      seed_marker: "seeded".to_string(),
    }
  }
}

/// Why a collection operation failed.
#[derive(Debug, Error)]
pub enum CollectionError {
  /// Reading or writing the durable store failed.
  #[error(transparent)]
  Store(#[from] anyhow::Error),

  /// `update` named an id that is not in the collection.
  #[error("wine not found: {id}")]
  NotFound { id: WineId },

  /// The mutation task panicked or the runtime shut down under it.
  #[error("collection operation aborted")]
  Aborted,
}

/// Shared handle to the canonical collection.
///
/// Construct once at startup and clone the handle into every consumer.
pub struct CollectionManager<S: KeyValueStore> {
  inner: Arc<Inner<S>>,
}

impl<S: KeyValueStore> Clone for CollectionManager<S> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

struct Seeding<S: KeyValueStore> {
  loader: SeedLoader<S>,
  defaults: Vec<WineRecord>,
}

struct Inner<S: KeyValueStore> {
  store: Arc<S>,
  collection_key: String,
  seeding: Option<Seeding<S>>,
  /// Set once seeding has completed for this manager.
  seed_checked: AtomicBool,
  ids: IdGenerator,
  /// Serializes every store-touching operation, FIFO.
  gate: Mutex<()>,
  mirror: watch::Sender<Arc<Collection>>,
  loading: AtomicBool,
}

impl<S: KeyValueStore> CollectionManager<S> {
  /// Create a manager over `store`.
  ///
  /// With `seed_defaults`, the first `load` or mutation writes them into
  /// an empty, never-seeded store. The mirror starts empty and `is_loading` is
  /// true until the first `load` completes.
  pub fn new(store: Arc<S>, keys: StoreKeys, seed_defaults: Option<Vec<WineRecord>>) -> Self {
    let seeding = seed_defaults.map(|defaults| Seeding {
      loader: SeedLoader::new(Arc::clone(&store), keys.collection.clone(), keys.seed_marker),
      defaults,
    });
    let (mirror, _) = watch::channel(Arc::new(Collection::new()));

    Self {
      inner: Arc::new(Inner {
        store,
        collection_key: keys.collection,
        seeding,
        seed_checked: AtomicBool::new(false),
        ids: IdGenerator::new(),
        gate: Mutex::new(()),
        mirror,
        loading: AtomicBool::new(true),
      }),
    }
  }

  /// Seed if needed, then replace the mirror with the stored collection.
  ///
  /// Never fails: a read or parse failure yields an empty collection
  /// and a log entry.
  pub async fn load(&self) -> Collection {
    let _guard = self.inner.gate.lock().await;
    self.inner.reload_locked().await
  }

  /// Append a new record built from `draft`. Returns the assigned id.
  ///
  /// # Errors
  /// `Store` if the read or write failed; nothing changed.
  pub async fn add(&self, draft: WineDraft) -> Result<WineId, CollectionError> {
    let inner = Arc::clone(&self.inner);
    Self::spawn_mutation("add", async move { inner.add(draft).await }).await
  }

  /// Replace the record with the same id, keeping its position.
  ///
  /// # Errors
  /// `NotFound` if no record has that id (nothing written), `Store` if
  /// the read or write failed.
  pub async fn update(&self, record: WineRecord) -> Result<(), CollectionError> {
    let inner = Arc::clone(&self.inner);
    Self::spawn_mutation("update", async move { inner.update(record).await }).await
  }

  /// Remove the record with `id`.
  ///
  /// Returns `Ok(false)` when no record matched. The filtered (unchanged)
  /// collection is still written in that case.
  ///
  /// # Errors
  /// `Store` if the read or write failed; nothing changed.
  pub async fn delete_by_id(&self, id: &str) -> Result<bool, CollectionError> {
    let inner = Arc::clone(&self.inner);
    let id = id.to_string();
    Self::spawn_mutation("delete", async move { inner.delete(&id).await }).await
  }

  /// Remove the persisted collection and empty the mirror.
  ///
  /// # Errors
  /// `Store` if the remove failed; the mirror is left as it was.
  pub async fn clear_all(&self) -> Result<(), CollectionError> {
    let inner = Arc::clone(&self.inner);
    Self::spawn_mutation("clear", async move { inner.clear().await }).await
  }

  /// Look up a record in the mirror. Does not touch the store.
  pub fn get_by_id(&self, id: &str) -> Option<WineRecord> {
    self.inner.mirror.borrow().iter().find(|w| w.id == id).cloned()
  }

  /// The mirror as of the last completed operation.
  pub fn snapshot(&self) -> Arc<Collection> {
    Arc::clone(&*self.inner.mirror.borrow())
  }

  /// Receive a new snapshot after every load and successful mutation.
  pub fn subscribe(&self) -> watch::Receiver<Arc<Collection>> {
    self.inner.mirror.subscribe()
  }

  /// True until the first `load` finishes, and during any reload.
  pub fn is_loading(&self) -> bool {
    self.inner.loading.load(Ordering::Acquire)
  }

  /// Check if the underlying store is usable.
  pub async fn is_healthy(&self) -> bool {
    self.inner.store.is_healthy().await
  }

  async fn spawn_mutation<T, F>(op: &'static str, fut: F) -> Result<T, CollectionError>
  where
    T: Send + 'static,
    F: Future<Output = Result<T, CollectionError>> + Send + 'static,
  {
    let result = match tokio::spawn(fut).await {
      Ok(result) => result,
      Err(e) => {
        error!(op, error = %e, "Collection task did not complete");
        Err(CollectionError::Aborted)
      }
    };

    if let Err(e) = &result {
      warn!(op, error = %e, "Collection mutation failed");
    }
    result
  }
}

impl<S: KeyValueStore> Inner<S> {
  #[instrument(skip(self, draft), fields(name = %draft.name))]
  async fn add(&self, draft: WineDraft) -> Result<WineId, CollectionError> {
    let _guard = self.gate.lock().await;
    self.seed_once().await;

    let mut wines = self.read_persisted().await?;
    let id = self.ids.next_id(&wines);
    wines.push(WineRecord::from_draft(id.clone(), draft));
    self.write_persisted(&wines).await?;

    let reloaded = self.reload_locked_or(wines).await;
    info!(id = %id, count = reloaded.len(), "Wine added");
    Ok(id)
  }

  #[instrument(skip(self, record), fields(id = %record.id))]
  async fn update(&self, record: WineRecord) -> Result<(), CollectionError> {
    let _guard = self.gate.lock().await;
    self.seed_once().await;

    let mut wines = self.read_persisted().await?;
    let Some(index) = position_of(&wines, &record.id) else {
      return Err(CollectionError::NotFound { id: record.id });
    };
    wines[index] = record;
    self.write_persisted(&wines).await?;

    self.reload_locked_or(wines).await;
    info!(index, "Wine updated");
    Ok(())
  }

  #[instrument(skip(self))]
  async fn delete(&self, id: &str) -> Result<bool, CollectionError> {
    let _guard = self.gate.lock().await;
    self.seed_once().await;

    let mut wines = self.read_persisted().await?;
    let before = wines.len();
    wines.retain(|w| w.id != id);
    let removed = wines.len() < before;
    if !removed {
      debug!("No wine with this id, writing collection unchanged");
    }
    self.write_persisted(&wines).await?;

    let reloaded = self.reload_locked_or(wines).await;
    info!(removed, count = reloaded.len(), "Wine deleted");
    Ok(removed)
  }

  #[instrument(skip(self))]
  async fn clear(&self) -> Result<(), CollectionError> {
    let _guard = self.gate.lock().await;
    self.seed_once().await;

    self
      .store
      .remove(&self.collection_key)
      .await
      .context("Failed to remove stored collection")?;
    self.publish(Collection::new());

    info!("Collection cleared");
    Ok(())
  }

  /// Caller must hold the gate.
  async fn reload_locked(&self) -> Collection {
    self.reload_locked_or(Collection::new()).await
  }

  /// Reload, publishing `fallback` if the store cannot be read. After a
  /// write the fallback is the collection just persisted.
  async fn reload_locked_or(&self, fallback: Collection) -> Collection {
    self.loading.store(true, Ordering::Release);
    self.seed_once().await;

    let wines = match self.read_persisted().await {
      Ok(wines) => wines,
      Err(e) => {
        warn!(error = %e, fallback = fallback.len(), "Failed to read collection, using fallback");
        fallback
      }
    };

    self.publish(wines.clone());
    self.loading.store(false, Ordering::Release);
    debug!(count = wines.len(), "Collection loaded");
    wines
  }

  async fn seed_once(&self) {
    if self.seed_checked.load(Ordering::Acquire) {
      return;
    }
    let Some(seeding) = &self.seeding else {
      self.seed_checked.store(true, Ordering::Release);
      return;
    };

    match seeding.loader.ensure_seeded(&seeding.defaults).await {
      Ok(outcome) => {
        debug!(?outcome, "Seed check complete");
        self.seed_checked.store(true, Ordering::Release);
      }
      Err(e) => warn!(error = %e, "Seeding failed, continuing with stored data"),
    }
  }

  /// Read the stored collection. An absent key or unparsable blob is an
  /// empty collection; only a failed store read is an error.
  async fn read_persisted(&self) -> anyhow::Result<Collection> {
    let Some(json) = self
      .store
      .get(&self.collection_key)
      .await
      .context("Failed to read stored collection")?
    else {
      return Ok(Collection::new());
    };

    match decode_collection(&json) {
      Ok(wines) => Ok(wines),
      Err(e) => {
        warn!(error = %e, "Stored collection unreadable, treating as empty");
        Ok(Collection::new())
      }
    }
  }

  async fn write_persisted(&self, wines: &[WineRecord]) -> anyhow::Result<()> {
    let json = encode_collection(wines)?;
    self
      .store
      .set(&self.collection_key, &json)
      .await
      .context("Failed to write collection")
  }

  fn publish(&self, wines: Collection) {
    self.mirror.send_replace(Arc::new(wines));
  }
}
