//! Configuration Loader - File Loading and Validation
//!
//! Handles loading the TOML config, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::{AppConfig, StorageBackend};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
  let path = path.as_ref();

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)
    .with_context(|| format!("Invalid config file: {}", path.display()))?;

  info!(
    path = %path.display(),
    backend = ?config.storage.backend,
    data_dir = %config.storage.data_dir,
    seed = config.seed.enabled,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse config TOML")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - A known log level
/// - Non-empty, distinct store keys
/// - A data directory when the file backend is selected
pub fn validate_config(config: &AppConfig) -> Result<()> {
  // App validation
  anyhow::ensure!(
    !config.app.name.trim().is_empty(),
    "app.name must not be empty"
  );
  anyhow::ensure!(
    LOG_LEVELS.contains(&config.app.log_level.to_lowercase().as_str()),
    "app.log_level must be one of {LOG_LEVELS:?}, got {:?}",
    config.app.log_level
  );

  // Storage validation
  let storage = &config.storage;
  anyhow::ensure!(
    !storage.collection_key.is_empty(),
    "storage.collection_key must not be empty"
  );
  anyhow::ensure!(
    !storage.seed_marker_key.is_empty(),
    "storage.seed_marker_key must not be empty"
  );
  anyhow::ensure!(
    storage.collection_key != storage.seed_marker_key,
    "storage.collection_key and storage.seed_marker_key must differ, both are {:?}",
    storage.collection_key
  );
  if storage.backend == StorageBackend::File {
    anyhow::ensure!(
      !storage.data_dir.trim().is_empty(),
      "storage.data_dir must not be empty for the file backend"
    );
  }

  Ok(())
}
