//! Cancel command implementation
//!
//! Sends a `cancel` action through the dispatcher: the import job record is
//! marked failed and its temporary artifacts are discarded.

use super::{build_runtime, EXIT_FATAL, EXIT_OK, EXIT_PROTOCOL};
use crate::config::load_config_or_default;
use crate::core::controller::{JobAction, JobRequest};
use clap::Args;

/// Arguments for the cancel command
#[derive(Args, Debug)]
pub struct CancelArgs {
    /// Job id to cancel
    pub job_id: String,
}

impl CancelArgs {
    /// Execute the cancel command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        println!("🛑 Canceling job {}", self.job_id);
        println!();

        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {}", e);
                return Ok(EXIT_PROTOCOL);
            }
        };

        let runtime = match build_runtime(&config) {
            Ok(r) => r,
            Err(e) => {
                println!("❌ Failed to prepare storage");
                println!("   Error: {}", e);
                return Ok(EXIT_FATAL);
            }
        };

        let response = runtime
            .controller
            .handle(JobRequest {
                action: JobAction::Cancel,
                job_id: self.job_id.clone(),
                headers: Vec::new(),
                file_name: None,
                data_batch: Vec::new(),
                total_rows: None,
                batch_index: None,
                has_more_batches: None,
                created_by: None,
            })
            .await;

        match response.status {
            200 => {
                println!("✅ Job canceled, temporary artifacts removed");
                Ok(EXIT_OK)
            }
            400 | 404 => {
                println!("❌ Cancel failed: {}", response.body_json());
                Ok(EXIT_PROTOCOL)
            }
            _ => {
                println!("❌ Cancel failed: {}", response.body_json());
                Ok(EXIT_FATAL)
            }
        }
    }
}
