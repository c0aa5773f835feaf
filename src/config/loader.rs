//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::TabulaConfig;
use crate::domain::errors::TabulaError;
use crate::domain::result::Result;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Parses the TOML into TabulaConfig
/// 3. Applies environment variable overrides (TABULA_* prefix)
/// 4. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use tabula::config::loader::load_config;
///
/// let config = load_config("tabula.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<TabulaConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(TabulaError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        TabulaError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut config: TabulaConfig = toml::from_str(&contents)
        .map_err(|e| TabulaError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        TabulaError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Loads configuration from a file if present, otherwise uses defaults
///
/// Environment variable overrides and validation apply either way.
///
/// # Errors
///
/// Returns an error if an existing file cannot be parsed or the resulting
/// configuration is invalid.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<TabulaConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    let mut config = TabulaConfig::default();
    apply_env_overrides(&mut config);
    config.validate().map_err(|e| {
        TabulaError::Configuration(format!("Configuration validation failed: {}", e))
    })?;
    Ok(config)
}

/// Applies environment variable overrides using the TABULA_* prefix
///
/// Environment variables follow the pattern: TABULA_<SECTION>_<KEY>
/// For example: TABULA_STORAGE_ARTIFACT_ROOT, TABULA_IMPORT_CHUNK_SIZE
fn apply_env_overrides(config: &mut TabulaConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("TABULA_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Storage overrides
    if let Ok(val) = std::env::var("TABULA_STORAGE_ARTIFACT_ROOT") {
        config.storage.artifact_root = val;
    }
    if let Ok(val) = std::env::var("TABULA_STORAGE_STATE_DIR") {
        config.storage.state_dir = val;
    }
    if let Ok(val) = std::env::var("TABULA_STORAGE_PUBLIC_BASE_URL") {
        config.storage.public_base_url = val;
    }

    // Import overrides
    if let Ok(val) = std::env::var("TABULA_IMPORT_CHUNK_SIZE") {
        if let Ok(size) = val.parse() {
            config.import.chunk_size = size;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("TABULA_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("TABULA_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
