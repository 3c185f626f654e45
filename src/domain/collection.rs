//! The ordered wine collection and its stored text form.
//!
//! The whole collection is stored under one key as a JSON array of
//! records. Search and sort helpers here are for display code; the
//! manager itself only ever appends, replaces in place, or filters.

use std::cmp::Ordering;

use anyhow::{Context, Result};

use super::wine::WineRecord;

/// All known records, in insertion order.
pub type Collection = Vec<WineRecord>;

/// Serialize a collection to its stored JSON text.
pub fn encode_collection(wines: &[WineRecord]) -> Result<String> {
    serde_json::to_string(wines).context("Failed to serialize wine collection")
}

/// Parse stored JSON text back into a collection.
pub fn decode_collection(json: &str) -> Result<Collection> {
    serde_json::from_str(json).context("Failed to parse wine collection JSON")
}

/// Position of the record with `id`, if present.
#[must_use]
pub fn position_of(wines: &[WineRecord], id: &str) -> Option<usize> {
    wines.iter().position(|w| w.id == id)
}

/// Case-insensitive substring match on name, region or producer.
///
/// An empty query matches every record.
#[must_use]
pub fn matches_query(wine: &WineRecord, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    wine.name.to_lowercase().contains(&needle)
        || wine.region.to_lowercase().contains(&needle)
        || wine
            .producer
            .as_deref()
            .is_some_and(|p| p.to_lowercase().contains(&needle))
}

/// Records matching `query`, in collection order.
#[must_use]
pub fn search<'a>(wines: &'a [WineRecord], query: &str) -> Vec<&'a WineRecord> {
    wines.iter().filter(|w| matches_query(w, query)).collect()
}

/// Display orderings. Sorting never touches the stored order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Insertion order.
    #[default]
    Added,
    /// Highest rating first.
    Rating,
    /// Oldest vintage first.
    Vintage,
    /// Alphabetical by name, case-insensitive.
    Name,
}

/// Sort a borrowed view in place. The sort is stable.
pub fn sort_view(view: &mut [&WineRecord], order: SortOrder) {
    match order {
        SortOrder::Added => {}
        SortOrder::Rating => view.sort_by(|a, b| {
            b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal)
        }),
        SortOrder::Vintage => view.sort_by_key(|w| w.year),
        SortOrder::Name => view.sort_by_key(|w| w.name.to_lowercase()),
    }
}
