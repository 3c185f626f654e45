//! Record id allocation.
//!
//! Ids are the current Unix time in milliseconds, rendered as decimal
//! text. Within one process they are strictly increasing, so two adds in
//! the same millisecond still get distinct ids, and an id already taken
//! in the collection is skipped.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use super::wine::{WineId, WineRecord};

/// Timestamp-derived, strictly increasing id source.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last_issued: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id that is not used by any record in `existing`.
    pub fn next_id(&self, existing: &[WineRecord]) -> WineId {
        loop {
            let candidate = self.next_raw();
            let id = candidate.to_string();
            if !existing.iter().any(|w| w.id == id) {
                return id;
            }
        }
    }

    fn next_raw(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last_issued.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match self.last_issued.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}
