//! Import command implementation
//!
//! Stages a local spreadsheet into the artifact store, creates an import job
//! record and runs it to completion through the action dispatcher.

use super::{build_runtime, EXIT_FATAL, EXIT_JOB_ERROR, EXIT_OK, EXIT_PROTOCOL, EXIT_ROW_ERRORS};
use crate::adapters::artifacts::staged_import_path;
use crate::adapters::jobs::JobStore;
use crate::config::load_config_or_default;
use crate::core::controller::{JobAction, JobRequest};
use crate::domain::ids::{JobId, TableName};
use crate::domain::job::ImportJob;
use bytes::Bytes;
use clap::Args;
use std::path::Path;
use std::str::FromStr;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to the spreadsheet to import
    #[arg(short, long)]
    pub file: String,

    /// Destination table name
    #[arg(short, long)]
    pub table: String,

    /// Job id; a fresh UUID is generated when omitted
    #[arg(long)]
    pub job_id: Option<String>,

    /// Upsert by this key field instead of plain inserts
    #[arg(long)]
    pub upsert_key: Option<String>,

    /// Identity recorded as the initiating actor
    #[arg(long, default_value = "system")]
    pub created_by: String,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        println!("📥 Importing {}", self.file);
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

        let bytes = match std::fs::read(&self.file) {
            Ok(b) => b,
            Err(e) => {
                println!("❌ Cannot read {}", self.file);
                println!("   Error: {}", e);
                return Ok(EXIT_PROTOCOL);
            }
        };

        let table = match TableName::from_str(&self.table) {
            Ok(t) => t,
            Err(e) => {
                println!("❌ Invalid table name: {}", e);
                return Ok(EXIT_PROTOCOL);
            }
        };

        let job_id = match &self.job_id {
            Some(raw) => match JobId::from_str(raw) {
                Ok(id) => id,
                Err(e) => {
                    println!("❌ Invalid job id: {}", e);
                    return Ok(EXIT_PROTOCOL);
                }
            },
            None => JobId::generate(),
        };

        let file_name = Path::new(&self.file)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.file.clone());

        let mut job = ImportJob::new(job_id.clone(), &file_name, table, &self.created_by);
        if let Some(key) = &self.upsert_key {
            job = job.with_upsert_key(key);
        }
        runtime.jobs.save_import(&job).await?;
        runtime
            .artifacts
            .put(
                &staged_import_path(job_id.as_str(), &file_name),
                Bytes::from(bytes),
            )
            .await?;

        println!("   Job id: {}", job_id);

        let response = runtime
            .controller
            .handle(JobRequest {
                action: JobAction::Process,
                job_id: job_id.to_string(),
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
            println!("❌ Import failed: {}", response.body_json());
            return Ok(match response.status {
                400 | 404 => EXIT_PROTOCOL,
                _ => EXIT_JOB_ERROR,
            });
        }

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
            return Ok(EXIT_OK);
        }

        println!();
        println!("⚠️  {} row error(s):", job.errors.len());
        for error in job.errors.iter().take(10) {
            println!("   row {}: {}", error.row, error.message);
        }
        if job.errors.len() > 10 {
            println!("   ... and {} more", job.errors.len() - 10);
        }
        Ok(EXIT_ROW_ERRORS)
    }
}
