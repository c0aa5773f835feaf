//! Command implementations
//!
//! Each subcommand lives in its own module and exposes an `execute` method
//! returning a process exit code:
//!
//! - 0: success
//! - 2: import completed with row errors
//! - 3: job ended in the error state
//! - 4: protocol or configuration error
//! - 5: fatal error

pub mod cancel;
pub mod export;
pub mod import;
pub mod init;
pub mod resume;
pub mod status;
pub mod validate;

use crate::adapters::artifacts::ArtifactStore;
use crate::adapters::jobs::{FsJobStore, JobStore};
use crate::adapters::tables::MemoryTableStore;
use crate::config::TabulaConfig;
use crate::core::chunk::ChunkPlanner;
use crate::core::controller::JobController;
use std::sync::Arc;

/// Exit code for a clean run
pub const EXIT_OK: i32 = 0;
/// Exit code for an import that completed with row errors
pub const EXIT_ROW_ERRORS: i32 = 2;
/// Exit code for a job that ended in the error state
pub const EXIT_JOB_ERROR: i32 = 3;
/// Exit code for protocol and configuration errors
pub const EXIT_PROTOCOL: i32 = 4;
/// Exit code for fatal errors
pub const EXIT_FATAL: i32 = 5;

/// Collaborators a command runs against, wired from configuration
pub struct Runtime {
    /// Job record store shared with the controller
    pub jobs: Arc<FsJobStore>,
    /// Artifact store shared with the controller
    pub artifacts: ArtifactStore,
    /// Action dispatcher
    pub controller: JobController,
}

/// Builds the command runtime from configuration
///
/// Job records go to the configured state directory and artifacts to the
/// configured artifact root, so consecutive invocations observe each other's
/// progress. The destination table store is in-memory; rows imported by the
/// CLI are not durable beyond the invocation.
///
/// # Errors
///
/// Returns an error if the artifact root cannot be prepared.
pub fn build_runtime(config: &TabulaConfig) -> crate::domain::Result<Runtime> {
    let jobs = Arc::new(FsJobStore::new(&config.storage.state_dir));
    let artifacts = ArtifactStore::local(
        &config.storage.artifact_root,
        &config.storage.public_base_url,
    )?;
    let tables = Arc::new(MemoryTableStore::new());
    let controller = JobController::new(
        jobs.clone() as Arc<dyn JobStore>,
        tables,
        artifacts.clone(),
        ChunkPlanner::new(config.import.chunk_size),
    );

    Ok(Runtime {
        jobs,
        artifacts,
        controller,
    })
}
