//! Resume command implementation
//!
//! Sends a `resume` action through the dispatcher. A resume restarts the
//! import from the beginning against the still-staged source file; with a
//! plain-insert destination the re-attempted rows duplicate.

use super::{build_runtime, EXIT_FATAL, EXIT_JOB_ERROR, EXIT_OK, EXIT_PROTOCOL, EXIT_ROW_ERRORS};
use crate::adapters::jobs::JobStore;
use crate::config::load_config_or_default;
use crate::core::controller::{JobAction, JobRequest};
use crate::domain::ids::JobId;
use clap::Args;
use std::str::FromStr;

/// Arguments for the resume command
#[derive(Args, Debug)]
pub struct ResumeArgs {
    /// Job id to re-run
    pub job_id: String,
}

impl ResumeArgs {
    /// Execute the resume command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        println!("🔄 Resuming job {}", self.job_id);
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
                action: JobAction::Resume,
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

        if response.status != 200 {
            println!("❌ Resume failed: {}", response.body_json());
            return Ok(match response.status {
                400 | 404 => EXIT_PROTOCOL,
                _ => EXIT_JOB_ERROR,
            });
        }

        let job_id = JobId::from_str(&self.job_id).map_err(|e| anyhow::anyhow!(e))?;
        let job = runtime
            .jobs
            .load_import(&job_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("job record vanished after processing"))?;

        println!(
            "✅ Import complete: {}/{} rows",
            job.processed_rows, job.total_rows
        );

        if job.errors.is_empty() {
            Ok(EXIT_OK)
        } else {
            println!("⚠️  {} row error(s)", job.errors.len());
            Ok(EXIT_ROW_ERRORS)
        }
    }
}
