//! Integration Tests - Collection Layer Against Real and Mock Stores
//!
//! Tests the collection manager end to end over the file store, an
//! in-memory store with injectable write failures, and mockall mocks
//! of the store port. Uses tokio::test for async tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use mockall::predicate::*;

use cellar_keeper::adapters::persistence::{FileStore, MemoryStore};
use cellar_keeper::domain::collection::{decode_collection, encode_collection};
use cellar_keeper::domain::samples::sample_wines;
use cellar_keeper::domain::wine::{WineDraft, WineRecord, WineType};
use cellar_keeper::ports::KeyValueStore;
use cellar_keeper::usecases::{CollectionError, CollectionManager, SeedLoader, SeedOutcome, StoreKeys};

// ---- Mock Definitions ----

mock! {
    pub Store {}

    #[async_trait::async_trait]
    impl cellar_keeper::ports::store::KeyValueStore for Store {
        async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
        async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
        async fn remove(&self, key: &str) -> anyhow::Result<()>;
        async fn is_healthy(&self) -> bool;
    }
}

/// Memory store whose writes can be switched to fail, counting writes.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
    fail_read_after_write: AtomicBool,
    read_armed: AtomicBool,
    writes: AtomicUsize,
    write_delay: Option<Duration>,
}

impl FlakyStore {
    fn slow(delay: Duration) -> Self {
        Self {
            write_delay: Some(delay),
            ..Self::default()
        }
    }

    fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    /// Make the first read after the next successful write fail.
    fn fail_next_read_after_write(&self) {
        self.fail_read_after_write.store(true, Ordering::SeqCst);
    }

    fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        anyhow::ensure!(!self.read_armed.swap(false, Ordering::SeqCst), "I/O error");
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        anyhow::ensure!(!self.fail_writes.load(Ordering::SeqCst), "disk full");
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await?;
        if self.fail_read_after_write.swap(false, Ordering::SeqCst) {
            self.read_armed.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        anyhow::ensure!(!self.fail_writes.load(Ordering::SeqCst), "read-only file system");
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(key).await
    }

    async fn is_healthy(&self) -> bool {
        !self.fail_writes.load(Ordering::SeqCst)
    }
}

fn draft(name: &str, rating: f64) -> WineDraft {
    WineDraft::new(name, "Campania", 2019, WineType::White, rating)
        .with_producer("Feudi di San Gregorio")
        .with_grapes_csv("Fiano, Greco")
}

fn three_defaults() -> Vec<WineRecord> {
    sample_wines().into_iter().take(3).collect()
}

fn unseeded<S: KeyValueStore>(store: Arc<S>) -> CollectionManager<S> {
    CollectionManager::new(store, StoreKeys::default(), None)
}

// ---- Seeding ----

#[tokio::test]
async fn test_first_load_seeds_three_defaults_then_stays_put() {
    let store = Arc::new(MemoryStore::new());
    let mgr = CollectionManager::new(Arc::clone(&store), StoreKeys::default(), Some(three_defaults()));

    assert_eq!(mgr.load().await, three_defaults());
    assert_eq!(mgr.load().await, three_defaults());

    // A fresh manager over the same store (app restart) does not seed again.
    let restarted = CollectionManager::new(Arc::clone(&store), StoreKeys::default(), Some(sample_wines()));
    assert_eq!(restarted.load().await, three_defaults());
}

#[tokio::test]
async fn test_clear_all_then_load_is_empty_and_seed_is_noop() {
    let store = Arc::new(MemoryStore::new());
    let mgr = CollectionManager::new(Arc::clone(&store), StoreKeys::default(), Some(three_defaults()));
    assert_eq!(mgr.load().await.len(), 3);

    mgr.clear_all().await.unwrap();
    assert!(mgr.snapshot().is_empty());
    assert!(mgr.load().await.is_empty());

    let seeder = SeedLoader::new(Arc::clone(&store), "wines", "seeded");
    let outcome = seeder.ensure_seeded(&three_defaults()).await.unwrap();
    assert_eq!(outcome, SeedOutcome::PreviouslySeeded);

    let restarted = CollectionManager::new(store, StoreKeys::default(), Some(three_defaults()));
    assert!(restarted.load().await.is_empty());
}

#[tokio::test]
async fn test_mutations_before_first_load_still_seed() {
    let store = Arc::new(MemoryStore::new());
    let mgr = CollectionManager::new(Arc::clone(&store), StoreKeys::default(), Some(sample_wines()));

    let id = mgr.add(draft("Fiano di Avellino", 8.2)).await.unwrap();
    let wines = mgr.load().await;
    assert_eq!(wines.len(), 6);
    assert_eq!(wines[..5], sample_wines()[..]);
    assert_eq!(wines[5].id, id);

    let restarted = CollectionManager::new(Arc::clone(&store), StoreKeys::default(), Some(sample_wines()));
    assert_eq!(restarted.load().await, wines);

    // Clearing a fresh store before any load marks it seeded.
    let other = Arc::new(MemoryStore::new());
    let mgr = CollectionManager::new(Arc::clone(&other), StoreKeys::default(), Some(sample_wines()));
    mgr.clear_all().await.unwrap();
    assert!(mgr.load().await.is_empty());
}

// ---- Mutations ----

#[tokio::test]
async fn test_add_then_load_yields_exactly_one_new_record() {
    let store = Arc::new(MemoryStore::new());
    let mgr = CollectionManager::new(store, StoreKeys::default(), Some(sample_wines()));
    let before = mgr.load().await;

    let id = mgr.add(draft("Fiano di Avellino", 8.2)).await.unwrap();
    let after = mgr.load().await;

    assert_eq!(after.len(), before.len() + 1);
    assert!(before.iter().all(|w| w.id != id));
    let added: Vec<&WineRecord> = after.iter().filter(|w| w.id == id).collect();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].to_draft(), draft("Fiano di Avellino", 8.2));
    // appended at the end
    assert_eq!(after.last().map(|w| w.id.as_str()), Some(id.as_str()));
}

#[tokio::test]
async fn test_update_twice_is_idempotent_and_keeps_position() {
    let store = Arc::new(MemoryStore::new());
    let mgr = CollectionManager::new(store, StoreKeys::default(), Some(sample_wines()));
    mgr.load().await;

    let mut gavi = mgr.get_by_id("4").unwrap();
    gavi.rating = 8.7;
    gavi.notes = Some("Even better a year on.".to_string());

    mgr.update(gavi.clone()).await.unwrap();
    let once = mgr.load().await;
    mgr.update(gavi.clone()).await.unwrap();
    let twice = mgr.load().await;

    assert_eq!(once, twice);
    assert_eq!(twice.len(), 5);
    assert_eq!(twice[3], gavi);
    assert_eq!(twice.iter().filter(|w| w.id == "4").count(), 1);
}

#[tokio::test]
async fn test_delete_existing_and_missing_ids() {
    let store = Arc::new(FlakyStore::default());
    let mgr = CollectionManager::new(Arc::clone(&store), StoreKeys::default(), Some(sample_wines()));
    mgr.load().await;

    assert!(mgr.delete_by_id("2").await.unwrap());
    assert_eq!(mgr.get_by_id("2"), None);
    assert_eq!(mgr.snapshot().len(), 4);

    // Missing id: success, unchanged list, but the write still happens.
    let writes = store.write_count();
    assert!(!mgr.delete_by_id("2").await.unwrap());
    assert_eq!(store.write_count(), writes + 1);
    assert_eq!(mgr.snapshot().len(), 4);
}

#[tokio::test]
async fn test_failed_write_leaves_store_and_mirror_unchanged() {
    let store = Arc::new(FlakyStore::default());
    let mgr = CollectionManager::new(Arc::clone(&store), StoreKeys::default(), Some(sample_wines()));
    let before = mgr.load().await;
    let stored_before = store.get("wines").await.unwrap();

    store.set_failing(true);

    assert!(matches!(mgr.add(draft("Greco", 7.0)).await, Err(CollectionError::Store(_))));
    let mut edited = before[0].clone();
    edited.rating = 1.0;
    assert!(mgr.update(edited).await.is_err());
    assert!(mgr.delete_by_id("1").await.is_err());
    assert!(mgr.clear_all().await.is_err());

    assert_eq!(*mgr.snapshot(), before);
    assert_eq!(store.get("wines").await.unwrap(), stored_before);

    store.set_failing(false);
    mgr.add(draft("Greco", 7.0)).await.unwrap();
    assert_eq!(mgr.snapshot().len(), before.len() + 1);
}

#[tokio::test]
async fn test_mirror_matches_store_when_reread_after_write_fails() {
    let store = Arc::new(FlakyStore::default());
    let mgr = CollectionManager::new(Arc::clone(&store), StoreKeys::default(), Some(sample_wines()));
    mgr.load().await;

    store.fail_next_read_after_write();
    let id = mgr.add(draft("Fiano di Avellino", 8.2)).await.unwrap();

    let stored = decode_collection(&store.get("wines").await.unwrap().unwrap()).unwrap();
    assert_eq!(stored.len(), 6);
    assert_eq!(*mgr.snapshot(), stored);
    assert!(mgr.get_by_id(&id).is_some());
    assert!(!mgr.is_loading());
}

#[tokio::test]
async fn test_concurrent_adds_are_not_lost() {
    let store = Arc::new(MemoryStore::new());
    let mgr = unseeded(Arc::clone(&store));
    mgr.load().await;

    let mut handles = Vec::new();
    for n in 0..20 {
        let handle = mgr.clone();
        handles.push(tokio::spawn(async move {
            handle.add(draft(&format!("Bottle {n}"), 6.0)).await
        }));
    }

    let mut ids = Vec::new();
    for h in handles {
        ids.push(h.await.unwrap().unwrap());
    }

    let wines = mgr.load().await;
    assert_eq!(wines.len(), 20);
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);
}

#[tokio::test]
async fn test_dropped_caller_does_not_cancel_write() {
    let store = Arc::new(FlakyStore::slow(Duration::from_millis(50)));
    let mgr = unseeded(Arc::clone(&store));
    mgr.load().await;

    let result = tokio::time::timeout(Duration::from_millis(5), mgr.add(draft("Taurasi", 9.1))).await;
    assert!(result.is_err(), "add should still be in flight");

    tokio::time::sleep(Duration::from_millis(300)).await;
    let wines = mgr.load().await;
    assert_eq!(wines.len(), 1);
    assert_eq!(wines[0].name, "Taurasi");
}

// ---- Durability ----

#[tokio::test]
async fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let id = {
        let store = Arc::new(FileStore::new(dir.path()).await.unwrap());
        let mgr = CollectionManager::new(store, StoreKeys::default(), Some(sample_wines()));
        mgr.load().await;
        mgr.delete_by_id("5").await.unwrap();
        mgr.add(draft("Lacryma Christi", 7.4)).await.unwrap()
    };

    let store = Arc::new(FileStore::new(dir.path()).await.unwrap());
    let mgr = CollectionManager::new(store, StoreKeys::default(), Some(sample_wines()));
    let wines = mgr.load().await;

    assert_eq!(wines.len(), 5);
    assert!(wines.iter().all(|w| w.id != "5"));
    assert_eq!(mgr.get_by_id(&id).map(|w| w.name), Some("Lacryma Christi".to_string()));
}

#[tokio::test]
async fn test_stored_blob_is_a_json_array_under_configured_key() {
    let store = Arc::new(MemoryStore::new());
    let keys = StoreKeys {
        collection: "@cellar_wines".to_string(),
        seed_marker: "@cellar_seeded".to_string(),
    };
    let mgr = CollectionManager::new(Arc::clone(&store), keys, Some(three_defaults()));
    mgr.load().await;

    let blob = store.get("@cellar_wines").await.unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(3));
    assert_eq!(parsed[0]["type"], "red");
    assert!(store.get("wines").await.unwrap().is_none());
    assert!(store.get("@cellar_seeded").await.unwrap().is_some());
}

// ---- Store failures via mocks ----

#[tokio::test]
async fn test_load_read_failure_yields_empty() {
    let mut mock_store = MockStore::new();
    mock_store
        .expect_get()
        .with(eq("wines"))
        .returning(|_| Err(anyhow::anyhow!("I/O error")));

    let mgr = unseeded(Arc::new(mock_store));
    assert!(mgr.load().await.is_empty());
    assert!(!mgr.is_loading());
}

#[tokio::test]
async fn test_add_read_failure_writes_nothing() {
    let mut mock_store = MockStore::new();
    mock_store
        .expect_get()
        .returning(|_| Err(anyhow::anyhow!("I/O error")));
    mock_store.expect_set().never();

    let mgr = unseeded(Arc::new(mock_store));
    let err = mgr.add(draft("Falanghina", 7.0)).await.unwrap_err();
    assert!(matches!(err, CollectionError::Store(_)));
    assert!(mgr.snapshot().is_empty());
}

#[tokio::test]
async fn test_update_unknown_id_never_writes() {
    let stored = encode_collection(&three_defaults()).unwrap();

    let mut mock_store = MockStore::new();
    mock_store
        .expect_get()
        .with(eq("wines"))
        .returning(move |_| Ok(Some(stored.clone())));
    mock_store.expect_set().never();

    let mgr = unseeded(Arc::new(mock_store));
    mgr.load().await;

    let ghost = WineRecord::from_draft("404", draft("Ghost", 5.0));
    let err = mgr.update(ghost).await.unwrap_err();
    assert!(matches!(err, CollectionError::NotFound { .. }));
    assert_eq!(mgr.snapshot().len(), 3);
}

#[tokio::test]
async fn test_seed_failure_does_not_block_load() {
    let stored = encode_collection(&three_defaults()).unwrap();

    let mut mock_store = MockStore::new();
    mock_store
        .expect_get()
        .with(eq("seeded"))
        .returning(|_| Err(anyhow::anyhow!("permission denied")));
    mock_store
        .expect_get()
        .with(eq("wines"))
        .returning(move |_| Ok(Some(stored.clone())));
    mock_store.expect_set().never();

    let mgr = CollectionManager::new(Arc::new(mock_store), StoreKeys::default(), Some(sample_wines()));
    assert_eq!(mgr.load().await, three_defaults());
}

#[tokio::test]
async fn test_add_writes_full_collection_in_one_set() {
    let stored = encode_collection(&three_defaults()).unwrap();

    let mut mock_store = MockStore::new();
    mock_store
        .expect_get()
        .with(eq("wines"))
        .returning(move |_| Ok(Some(stored.clone())));
    mock_store
        .expect_set()
        .withf(|key, value| {
            key == "wines" && decode_collection(value).map(|w| w.len()).ok() == Some(4)
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let mgr = unseeded(Arc::new(mock_store));
    mgr.load().await;
    mgr.add(draft("Aglianico", 8.0)).await.unwrap();
}
