//! Configuration Module - TOML-based Application Configuration
//!
//! Loads and validates configuration from a TOML file. Every field has
//! a default, so a missing section (or no file at all) is valid.
//! Store location and key names are externalized here - nothing is
//! hardcoded in the usecases layer.

pub mod loader;

use serde::Deserialize;

use crate::usecases::StoreKeys;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
  /// Application identity and logging.
  #[serde(default)]
  pub app: AppSection,
  /// Durable store location and keys.
  #[serde(default)]
  pub storage: StorageConfig,
  /// First-run example data.
  #[serde(default)]
  pub seed: SeedConfig,
}

/// Application identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
  /// Human-readable application name.
  #[serde(default = "default_app_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Emit JSON log lines instead of plain text.
  #[serde(default)]
  pub json_logs: bool,
}

impl Default for AppSection {
  fn default() -> Self {
    Self {
      name: default_app_name(),
      log_level: default_log_level(),
      json_logs: false,
    }
  }
}

/// Which store adapter backs the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
  /// One JSON file per key under `data_dir`.
  #[default]
  File,
  /// Volatile, process-lifetime storage.
  Memory,
}

/// Durable store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
  #[serde(default)]
  pub backend: StorageBackend,
  /// Directory for the file store.
  #[serde(default = "default_data_dir")]
  pub data_dir: String,
  /// Key holding the serialized collection.
  #[serde(default = "default_collection_key")]
  pub collection_key: String,
  /// Key recording that first-run seeding happened.
  #[serde(default = "default_seed_marker_key")]
  pub seed_marker_key: String,
}

impl StorageConfig {
  /// Key names as the collection layer expects them.
  pub fn keys(&self) -> StoreKeys {
    StoreKeys {
      collection: self.collection_key.clone(),
      seed_marker: self.seed_marker_key.clone(),
    }
  }
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      backend: StorageBackend::default(),
      data_dir: default_data_dir(),
      collection_key: default_collection_key(),
      seed_marker_key: default_seed_marker_key(),
    }
  }
}

/// First-run seeding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
  /// Write the example collection into an empty store on first run.
  #[serde(default = "default_true")]
  pub enabled: bool,
}

impl Default for SeedConfig {
  fn default() -> Self {
    Self { enabled: true }
  }
}

// Default value functions for serde

fn default_app_name() -> String {
  "cellar-keeper".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

fn default_data_dir() -> String {
  "data".to_string()
}

fn default_collection_key() -> String {
  StoreKeys::default().collection
}

fn default_seed_marker_key() -> String {
  StoreKeys::default().seed_marker
}
