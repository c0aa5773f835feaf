//! Status command implementation
//!
//! This module implements the `status` command for inspecting the persisted
//! state of a job record, the same read path an external poller uses.

use super::{build_runtime, EXIT_FATAL, EXIT_OK, EXIT_PROTOCOL};
use crate::adapters::jobs::JobStore;
use crate::config::load_config_or_default;
use crate::domain::ids::JobId;
use clap::Args;
use std::str::FromStr;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Job id to inspect
    pub job_id: String,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        println!("📊 Job status");
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

        let job_id = match JobId::from_str(&self.job_id) {
            Ok(id) => id,
            Err(e) => {
                println!("❌ Invalid job id: {}", e);
                return Ok(EXIT_PROTOCOL);
            }
        };

        if let Some(job) = runtime.jobs.load_import(&job_id).await? {
            println!("Import job {}", job.id);
            println!("  status:     {:?}", job.status);
            println!("  progress:   {}%", job.progress);
            println!("  rows:       {}/{}", job.processed_rows, job.total_rows);
            println!("  table:      {}", job.table_name);
            println!("  file:       {}", job.file_name);
            println!("  created by: {}", job.created_by);
            println!("  updated at: {}", job.updated_at.format("%Y-%m-%d %H:%M:%S"));
            if !job.errors.is_empty() {
                println!("  errors:     {}", job.errors.len());
                for error in job.errors.iter().take(10) {
                    println!("    row {}: {}", error.row, error.message);
                }
            }
            return Ok(EXIT_OK);
        }

        if let Some(job) = runtime.jobs.load_export(&job_id).await? {
            println!("Export job {}", job.id);
            println!("  status:     {:?}", job.status);
            println!("  progress:   {}%", job.progress);
            println!("  rows:       {}/{}", job.processed_rows, job.total_rows);
            println!("  file:       {}", job.file_name);
            println!("  created by: {}", job.created_by);
            println!("  updated at: {}", job.updated_at.format("%Y-%m-%d %H:%M:%S"));
            if let Some(url) = &job.download_url {
                println!("  download:   {}", url);
            }
            if !job.errors.is_empty() {
                println!("  errors:     {}", job.errors.len());
                for error in &job.errors {
                    println!("    {}", error.message);
                }
            }
            return Ok(EXIT_OK);
        }

        println!("❌ No job record found for {}", self.job_id);
        Ok(EXIT_PROTOCOL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_args() {
        let args = StatusArgs {
            job_id: "j1".to_string(),
        };
        assert_eq!(args.job_id, "j1");
    }
}
