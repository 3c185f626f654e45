//! Core catalog domain types.
//!
//! Defines the persisted `WineRecord`, the id-less `WineDraft` callers
//! hand to the collection manager, and the caller-side validation rules
//! that keep bad values out of the collection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rating::{MAX_RATING, MIN_RATING};

/// Lightweight record identifier used at the ports boundary.
pub type WineId = String;

/// Oldest vintage accepted by validation (first 4-digit year).
pub const MIN_VINTAGE: i32 = 1000;

/// Newest vintage accepted by validation (last 4-digit year).
pub const MAX_VINTAGE: i32 = 9999;

/// Wine style. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WineType {
    Red,
    White,
    #[serde(rename = "rosé")]
    Rose,
    Sparkling,
}

impl WineType {
    /// All variants in display order.
    pub const ALL: [Self; 4] = [Self::Red, Self::White, Self::Rose, Self::Sparkling];
}

impl std::fmt::Display for WineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Red => "red",
            Self::White => "white",
            Self::Rose => "rosé",
            Self::Sparkling => "sparkling",
        })
    }
}

impl std::str::FromStr for WineType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" => Ok(Self::Red),
            "white" => Ok(Self::White),
            "rosé" | "rose" => Ok(Self::Rose),
            "sparkling" => Ok(Self::Sparkling),
            other => Err(ValidationError::UnknownType(other.to_string())),
        }
    }
}

/// Reasons a draft or record is refused before it reaches the collection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("wine name is required")]
    MissingName,

    #[error("wine region is required")]
    MissingRegion,

    #[error("vintage must be a 4-digit year, got {0}")]
    InvalidYear(i32),

    #[error("rating must be within [0, 10], got {0}")]
    RatingOutOfRange(f64),

    #[error("unknown wine type: {0}")]
    UnknownType(String),
}

/// One catalog entry describing a single wine.
///
/// Serialized field names match the stored JSON blob. Optional fields
/// are omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineRecord {
    /// Opaque unique identifier, assigned at creation.
    pub id: WineId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    pub region: String,
    /// 4-digit vintage.
    pub year: i32,
    #[serde(rename = "type")]
    pub wine_type: WineType,
    /// Rating on a 0-10 scale, one decimal place.
    pub rating: f64,
    /// Photo reference (path or URI). Never validated or owned here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Grape varieties in the order they were entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grapes: Option<Vec<String>>,
}

impl WineRecord {
    /// Build a record from a draft and a freshly allocated id.
    pub fn from_draft(id: impl Into<WineId>, draft: WineDraft) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            producer: draft.producer,
            region: draft.region,
            year: draft.year,
            wine_type: draft.wine_type,
            rating: draft.rating,
            image: draft.image,
            notes: draft.notes,
            grapes: draft.grapes,
        }
    }

    /// Strip the id, e.g. to edit a copy of an existing record.
    pub fn to_draft(&self) -> WineDraft {
        WineDraft {
            name: self.name.clone(),
            producer: self.producer.clone(),
            region: self.region.clone(),
            year: self.year,
            wine_type: self.wine_type,
            rating: self.rating,
            image: self.image.clone(),
            notes: self.notes.clone(),
            grapes: self.grapes.clone(),
        }
    }

    /// Apply the caller-side field rules to this record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, &self.region, self.year, self.rating)
    }
}

/// A wine record that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineDraft {
    pub name: String,
    #[serde(default)]
    pub producer: Option<String>,
    pub region: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub wine_type: WineType,
    pub rating: f64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub grapes: Option<Vec<String>>,
}

impl WineDraft {
    /// Start a draft with the required fields; optional fields are empty.
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        year: i32,
        wine_type: WineType,
        rating: f64,
    ) -> Self {
        Self {
            name: name.into(),
            producer: None,
            region: region.into(),
            year,
            wine_type,
            rating,
            image: None,
            notes: None,
            grapes: None,
        }
    }

    /// Set the producer; blank input leaves it absent.
    #[must_use]
    pub fn with_producer(mut self, producer: &str) -> Self {
        self.producer = non_blank(producer);
        self
    }

    /// Set tasting notes; blank input leaves them absent.
    #[must_use]
    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = non_blank(notes);
        self
    }

    /// Set the photo reference; blank input leaves it absent.
    #[must_use]
    pub fn with_image(mut self, image: &str) -> Self {
        self.image = non_blank(image);
        self
    }

    /// Parse a comma-separated grape list, e.g. `"Corvina, Rondinella"`.
    ///
    /// Entries are trimmed and empty entries dropped. Order and
    /// duplicates are kept as entered.
    #[must_use]
    pub fn with_grapes_csv(mut self, grapes: &str) -> Self {
        let list: Vec<String> = grapes
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect();
        self.grapes = if list.is_empty() { None } else { Some(list) };
        self
    }

    /// Trim the required text fields in place.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.region = self.region.trim().to_string();
        self
    }

    /// Apply the caller-side field rules to this draft.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, &self.region, self.year, self.rating)
    }
}

fn validate_fields(name: &str, region: &str, year: i32, rating: f64) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if region.trim().is_empty() {
        return Err(ValidationError::MissingRegion);
    }
    if !(MIN_VINTAGE..=MAX_VINTAGE).contains(&year) {
        return Err(ValidationError::InvalidYear(year));
    }
    if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::RatingOutOfRange(rating));
    }
    Ok(())
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
