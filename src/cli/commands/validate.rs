//! Validate-config command implementation
//!
//! This module implements the `validate-config` command for checking a
//! configuration file without running anything.

use super::{EXIT_OK, EXIT_PROTOCOL};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        println!("🔍 Validating configuration: {}", config_path);
        println!();

        match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!();
                println!("  log_level:       {}", config.application.log_level);
                println!("  artifact_root:   {}", config.storage.artifact_root);
                println!("  state_dir:       {}", config.storage.state_dir);
                println!("  public_base_url: {}", config.storage.public_base_url);
                println!("  chunk_size:      {}", config.import.chunk_size);
                println!("  file logging:    {}", config.logging.local_enabled);
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {}", e);
                Ok(EXIT_PROTOCOL)
            }
        }
    }
}
