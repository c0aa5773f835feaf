//! Configuration schema types
//!
//! This module defines the configuration structure for Tabula. All sections
//! have working defaults so the processor runs without a configuration file.

use serde::{Deserialize, Serialize};

/// Main Tabula configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TabulaConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Artifact and job-state storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Import processing settings
    #[serde(default)]
    pub import: ImportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TabulaConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.storage.validate()?;
        self.import.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Artifact and job-state storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the artifact store
    #[serde(default = "default_artifact_root")]
    pub artifact_root: String,

    /// Directory holding persisted job records
    #[serde(default = "default_state_dir")]
    pub state_dir: String,

    /// Base URL finalized export artifacts are served under
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.artifact_root.is_empty() {
            return Err("storage.artifact_root cannot be empty".to_string());
        }
        if self.state_dir.is_empty() {
            return Err("storage.state_dir cannot be empty".to_string());
        }
        if self.public_base_url.is_empty() {
            return Err("storage.public_base_url cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            artifact_root: default_artifact_root(),
            state_dir: default_state_dir(),
            public_base_url: default_public_base_url(),
        }
    }
}

/// Import processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Rows per processing chunk
    ///
    /// Also determines the export batch stride, so changing it while an
    /// export is in flight corrupts the in-progress artifact.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,
}

impl ImportConfig {
    fn validate(&self) -> Result<(), String> {
        if !(100..=10_000).contains(&self.chunk_size) {
            return Err(format!(
                "Invalid import.chunk_size {}. Must be between 100 and 10000",
                self.chunk_size
            ));
        }
        Ok(())
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_artifact_root() -> String {
    "./artifacts".to_string()
}

fn default_state_dir() -> String {
    "./state".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080/files".to_string()
}

fn default_chunk_size() -> u64 {
    1000
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
