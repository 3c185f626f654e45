//! Domain layer - Catalog records and pure catalog logic.
//!
//! Holds the wine record model, validation, the rating normalizer,
//! the collection codec, and statistics. Nothing here touches storage
//! (hexagonal architecture inner ring).

pub mod collection;
pub mod id;
pub mod rating;
pub mod samples;
pub mod stats;
pub mod wine;

// Re-export core types for convenience
pub use collection::{Collection, SortOrder};
pub use id::IdGenerator;
pub use rating::{StarRating, parse_rating_input, rating_for_star, stars_for};
pub use samples::sample_wines;
pub use stats::{CollectionStats, top_rated};
pub use wine::{ValidationError, WineDraft, WineId, WineRecord, WineType};
