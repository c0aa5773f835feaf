//! Job record store adapters
//!
//! The job record store is the external collaborator holding import and
//! export job rows, consumed through simple save/load operations keyed by
//! job id. Saves are upserts: the processor persists the whole record after
//! every chunk or batch, which is the sole point where partial progress
//! becomes durable and externally observable.
//!
//! Two implementations are provided: an in-process map for tests and
//! single-shot runs, and a filesystem store (one JSON document per job) so
//! separate short-lived invocations observe the same records.

use crate::domain::errors::TabulaError;
use crate::domain::ids::JobId;
use crate::domain::job::{ExportJob, ImportJob};
use crate::domain::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Job record store interface
///
/// Loads return `Ok(None)` for a missing record; saves create or replace the
/// record atomically with respect to a single invocation. There is no
/// optimistic-concurrency protection: two concurrent invocations saving the
/// same job id interleave last-write-wins.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Loads an import job record
    async fn load_import(&self, id: &JobId) -> Result<Option<ImportJob>>;

    /// Creates or replaces an import job record
    async fn save_import(&self, job: &ImportJob) -> Result<()>;

    /// Loads an export job record
    async fn load_export(&self, id: &JobId) -> Result<Option<ExportJob>>;

    /// Creates or replaces an export job record
    async fn save_export(&self, job: &ExportJob) -> Result<()>;
}

/// In-memory job store
///
/// Used by tests and by CLI runs that drive a whole job within one process.
#[derive(Default)]
pub struct MemoryJobStore {
    imports: RwLock<HashMap<String, ImportJob>>,
    exports: RwLock<HashMap<String, ExportJob>>,
}

impl MemoryJobStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn load_import(&self, id: &JobId) -> Result<Option<ImportJob>> {
        Ok(self.imports.read().await.get(id.as_str()).cloned())
    }

    async fn save_import(&self, job: &ImportJob) -> Result<()> {
        self.imports
            .write()
            .await
            .insert(job.id.as_str().to_string(), job.clone());
        Ok(())
    }

    async fn load_export(&self, id: &JobId) -> Result<Option<ExportJob>> {
        Ok(self.exports.read().await.get(id.as_str()).cloned())
    }

    async fn save_export(&self, job: &ExportJob) -> Result<()> {
        self.exports
            .write()
            .await
            .insert(job.id.as_str().to_string(), job.clone());
        Ok(())
    }
}

/// Filesystem job store
///
/// Persists each record as `{state_dir}/import/{id}.json` or
/// `{state_dir}/export/{id}.json`, so consecutive CLI invocations share the
/// same job state the way separate serverless invocations share a database
/// row.
pub struct FsJobStore {
    state_dir: PathBuf,
}

impl FsJobStore {
    /// Creates a store rooted at the given state directory
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    fn import_path(&self, id: &JobId) -> PathBuf {
        self.state_dir.join("import").join(format!("{}.json", id))
    }

    fn export_path(&self, id: &JobId) -> PathBuf {
        self.state_dir.join("export").join(format!("{}.json", id))
    }

    async fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<Option<T>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| TabulaError::Job(format!("corrupt job record {}: {e}", path.display())))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TabulaError::Job(format!(
                "failed to read job record {}: {e}",
                path.display()
            ))),
        }
    }

    async fn write_json<T: serde::Serialize>(path: &PathBuf, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                TabulaError::Job(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| TabulaError::Job(format!("failed to serialize job record: {e}")))?;
        tokio::fs::write(path, bytes).await.map_err(|e| {
            TabulaError::Job(format!("failed to write job record {}: {e}", path.display()))
        })
    }
}

#[async_trait]
impl JobStore for FsJobStore {
    async fn load_import(&self, id: &JobId) -> Result<Option<ImportJob>> {
        Self::read_json(&self.import_path(id)).await
    }

    async fn save_import(&self, job: &ImportJob) -> Result<()> {
        Self::write_json(&self.import_path(&job.id), job).await
    }

    async fn load_export(&self, id: &JobId) -> Result<Option<ExportJob>> {
        Self::read_json(&self.export_path(id)).await
    }

    async fn save_export(&self, job: &ExportJob) -> Result<()> {
        Self::write_json(&self.export_path(&job.id), job).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::TableName;
    use std::str::FromStr;

    fn sample_import(id: &str) -> ImportJob {
        ImportJob::new(
            JobId::from_str(id).unwrap(),
            "data.xlsx",
            TableName::from_str("schools").unwrap(),
            "admin-1",
        )
    }

    #[tokio::test]
    async fn test_memory_store_save_and_load() {
        let store = MemoryJobStore::new();
        let id = JobId::from_str("j1").unwrap();

        assert!(store.load_import(&id).await.unwrap().is_none());

        let mut job = sample_import("j1");
        store.save_import(&job).await.unwrap();

        job.total_rows = 2500;
        store.save_import(&job).await.unwrap();

        let loaded = store.load_import(&id).await.unwrap().unwrap();
        assert_eq!(loaded.total_rows, 2500);
    }

    #[tokio::test]
    async fn test_memory_store_export_independent_of_import() {
        let store = MemoryJobStore::new();
        let id = JobId::from_str("j1").unwrap();
        store.save_import(&sample_import("j1")).await.unwrap();

        // Same id in the export namespace is a different record.
        assert!(store.load_export(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fs_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsJobStore::new(dir.path());
        let id = JobId::from_str("j1").unwrap();

        assert!(store.load_import(&id).await.unwrap().is_none());

        let mut job = sample_import("j1");
        job.mark_processing();
        job.progress = 33;
        store.save_import(&job).await.unwrap();

        let loaded = store.load_import(&id).await.unwrap().unwrap();
        assert_eq!(loaded.progress, 33);
    }

    #[tokio::test]
    async fn test_fs_store_corrupt_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsJobStore::new(dir.path());
        let id = JobId::from_str("j1").unwrap();

        let path = dir.path().join("import").join("j1.json");
        tokio::fs::create_dir_all(path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let err = store.load_import(&id).await.unwrap_err();
        assert!(matches!(err, TabulaError::Job(_)));
    }
}
