//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_FATAL, EXIT_OK, EXIT_PROTOCOL};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "tabula.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        println!("📝 Initializing Tabula configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_PROTOCOL);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(()) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your storage paths", self.output);
                println!("  2. Validate configuration: tabula validate-config");
                println!("  3. Run an import: tabula import --file data.xlsx --table my_table");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    fn sample_config() -> &'static str {
        r#"# Tabula Configuration File
# Spreadsheet Import/Export Job Processor

[application]
log_level = "info"

[storage]
# Root directory of the artifact store
artifact_root = "./artifacts"
# Directory holding persisted job records
state_dir = "./state"
# Base URL finalized export artifacts are served under
public_base_url = "http://localhost:8080/files"

[import]
# Rows per processing chunk (100-10000)
chunk_size = 1000

[logging]
# JSON file logging in addition to console output
local_enabled = false
local_path = "./logs"
local_rotation = "daily"  # daily | hourly
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses_and_validates() {
        let config: crate::config::TabulaConfig =
            toml::from_str(InitArgs::sample_config()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.import.chunk_size, 1000);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tabula.toml");
        fs::write(&path, "# existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: false,
        };
        let code = args.execute().await.unwrap();
        assert_eq!(code, EXIT_PROTOCOL);
    }

    #[tokio::test]
    async fn test_init_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tabula.toml");

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: false,
        };
        let code = args.execute().await.unwrap();
        assert_eq!(code, EXIT_OK);
        assert!(path.exists());
    }
}
