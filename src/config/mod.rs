//! Configuration management for Tabula.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Tabula uses a TOML configuration file with support for:
//! - Default values for every setting (the file itself is optional)
//! - Environment variable overrides (`TABULA_*` prefix)
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tabula::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tabula.toml")?;
//!
//! println!("Artifact root: {}", config.storage.artifact_root);
//! println!("Chunk size: {}", config.import.chunk_size);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [storage]
//! artifact_root = "./artifacts"
//! state_dir = "./state"
//! public_base_url = "https://files.example.com"
//!
//! [import]
//! chunk_size = 1000
//!
//! [logging]
//! local_enabled = true
//! local_path = "./logs"
//! ```
//!
//! # Environment Variables
//!
//! Any setting can be overridden with a `TABULA_<SECTION>_<KEY>` variable:
//!
//! ```bash
//! export TABULA_STORAGE_ARTIFACT_ROOT="/var/lib/tabula/artifacts"
//! export TABULA_IMPORT_CHUNK_SIZE="2000"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, ImportConfig, LoggingConfig, StorageConfig, TabulaConfig,
};
