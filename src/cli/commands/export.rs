//! Export command implementation
//!
//! Drives a full export from a local JSON rows file: the rows are split into
//! chunk-sized batches and sent through the action dispatcher the way an
//! external caller would, one invocation per batch.

use super::{build_runtime, EXIT_FATAL, EXIT_JOB_ERROR, EXIT_OK, EXIT_PROTOCOL};
use crate::config::load_config_or_default;
use crate::core::controller::{JobAction, JobRequest, ResponseBody};
use crate::domain::ids::JobId;
use clap::Args;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Path to a JSON file holding an array of row objects
    #[arg(short, long)]
    pub rows: String,

    /// Name of the export artifact to produce
    #[arg(short, long)]
    pub file_name: String,

    /// Job id; a fresh UUID is generated when omitted
    #[arg(long)]
    pub job_id: Option<String>,

    /// Identity recorded as the initiating actor
    #[arg(long, default_value = "system")]
    pub created_by: String,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        println!("📤 Exporting {} to {}", self.rows, self.file_name);
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

        let contents = match std::fs::read_to_string(&self.rows) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Cannot read {}", self.rows);
                println!("   Error: {}", e);
                return Ok(EXIT_PROTOCOL);
            }
        };

        let rows: Vec<serde_json::Map<String, serde_json::Value>> =
            match serde_json::from_str(&contents) {
                Ok(r) => r,
                Err(e) => {
                    println!("❌ Rows file must be a JSON array of objects");
                    println!("   Error: {}", e);
                    return Ok(EXIT_PROTOCOL);
                }
            };

        if rows.is_empty() {
            println!("❌ Rows file is empty, nothing to export");
            return Ok(EXIT_PROTOCOL);
        }

        let headers: Vec<String> = rows[0].keys().cloned().collect();
        let total = rows.len() as u64;
        let job_id = match &self.job_id {
            Some(raw) => raw.clone(),
            None => JobId::generate().to_string(),
        };
        println!("   Job id: {}", job_id);

        let chunk_size = config.import.chunk_size as usize;
        let batches: Vec<_> = rows.chunks(chunk_size).collect();

        for (index, batch) in batches.iter().enumerate() {
            let first = index == 0;
            let has_more = index + 1 < batches.len();

            let response = runtime
                .controller
                .handle(JobRequest {
                    action: if first {
                        JobAction::Export
                    } else {
                        JobAction::ExportBatch
                    },
                    job_id: job_id.clone(),
                    headers: if first { headers.clone() } else { Vec::new() },
                    file_name: first.then(|| self.file_name.clone()),
                    data_batch: batch.to_vec(),
                    total_rows: first.then_some(total),
                    batch_index: Some(index as u64),
                    has_more_batches: Some(has_more),
                    created_by: first.then(|| self.created_by.clone()),
                })
                .await;

            if response.status != 200 {
                println!("❌ Export failed: {}", response.body_json());
                return Ok(match response.status {
                    400 => EXIT_PROTOCOL,
                    _ => EXIT_JOB_ERROR,
                });
            }

            if let ResponseBody::Success(body) = &response.body {
                if has_more {
                    println!(
                        "   batch {}: {}/{} rows ({}%)",
                        index,
                        body.processed.unwrap_or(0),
                        total,
                        body.progress.unwrap_or(0)
                    );
                } else if let Some(url) = &body.download_url {
                    println!();
                    println!("✅ Export complete: {} rows", body.processed.unwrap_or(0));
                    println!("   Download: {}", url);
                }
            }
        }

        Ok(EXIT_OK)
    }
}
