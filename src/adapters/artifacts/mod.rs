//! Artifact store adapter
//!
//! Blob storage for staged source files, in-progress export artifacts and
//! finalized export artifacts, built on the `object_store` abstraction so
//! local filesystem and in-memory backends are interchangeable. The store is
//! consumed through named-object get/put/delete operations scoped to one
//! bucket-like root.
//!
//! Path layout:
//! - `temp-imports/{jobId}/{fileName}` - staged import source
//! - `temp-exports/{jobId}/temp_{fileName}` - in-progress export artifact
//! - `exports/{createdBy}/{fileName}` - finalized, publicly linked artifact

use crate::domain::errors::ArtifactError;
use bytes::Bytes;
use futures::StreamExt;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use std::path::Path;
use std::sync::Arc;

/// Prefix for staged import source files
pub const TEMP_IMPORTS_PREFIX: &str = "temp-imports";

/// Prefix for in-progress export artifacts
pub const TEMP_EXPORTS_PREFIX: &str = "temp-exports";

/// Prefix for finalized export artifacts
pub const EXPORTS_PREFIX: &str = "exports";

/// Path of a staged import source file
pub fn staged_import_path(job_id: &str, file_name: &str) -> String {
    format!("{TEMP_IMPORTS_PREFIX}/{job_id}/{file_name}")
}

/// Path of an in-progress export artifact
pub fn temp_export_path(job_id: &str, file_name: &str) -> String {
    format!("{TEMP_EXPORTS_PREFIX}/{job_id}/temp_{file_name}")
}

/// Path of a finalized export artifact, scoped to the creating actor
pub fn final_export_path(created_by: &str, file_name: &str) -> String {
    format!("{EXPORTS_PREFIX}/{created_by}/{file_name}")
}

/// Artifact store over an `object_store` backend
///
/// Wraps the backend with domain error mapping and retrieval-link derivation.
/// One instance covers both the temporary and the permanent area; the areas
/// are distinguished by path prefix only.
#[derive(Clone)]
pub struct ArtifactStore {
    store: Arc<dyn ObjectStore>,
    public_base_url: String,
}

impl ArtifactStore {
    /// Creates a store over an arbitrary `object_store` backend
    pub fn new(store: Arc<dyn ObjectStore>, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates an in-memory store, used by tests and single-shot runs
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()), "memory://tabula")
    }

    /// Creates a store rooted at a local directory
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be used as a store root.
    pub fn local(
        root: impl AsRef<Path>,
        public_base_url: impl Into<String>,
    ) -> Result<Self, ArtifactError> {
        let root = root.as_ref();
        std::fs::create_dir_all(root).map_err(|e| ArtifactError::InvalidPath(format!(
            "cannot create artifact root {}: {e}",
            root.display()
        )))?;
        let store = LocalFileSystem::new_with_prefix(root)
            .map_err(|e| ArtifactError::InvalidPath(e.to_string()))?;
        Ok(Self::new(Arc::new(store), public_base_url))
    }

    fn object_path(path: &str) -> Result<ObjectPath, ArtifactError> {
        ObjectPath::parse(path).map_err(|e| ArtifactError::InvalidPath(format!("{path}: {e}")))
    }

    /// Reads an object's bytes
    ///
    /// # Errors
    ///
    /// Returns `ArtifactError::NotFound` if no object exists at the path.
    pub async fn get(&self, path: &str) -> Result<Bytes, ArtifactError> {
        let key = Self::object_path(path)?;
        let result = self.store.get(&key).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => ArtifactError::NotFound(path.to_string()),
            other => ArtifactError::ReadFailed {
                path: path.to_string(),
                message: other.to_string(),
            },
        })?;

        result.bytes().await.map_err(|e| ArtifactError::ReadFailed {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Reads an object's bytes, mapping a missing object to `None`
    pub async fn get_opt(&self, path: &str) -> Result<Option<Bytes>, ArtifactError> {
        match self.get(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(ArtifactError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Writes an object, replacing any existing content
    pub async fn put(&self, path: &str, data: Bytes) -> Result<(), ArtifactError> {
        let key = Self::object_path(path)?;
        self.store
            .put(&key, PutPayload::from(data))
            .await
            .map_err(|e| ArtifactError::WriteFailed {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Deletes an object; deleting a missing object is not an error
    pub async fn delete(&self, path: &str) -> Result<(), ArtifactError> {
        let key = Self::object_path(path)?;
        match self.store.delete(&key).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(ArtifactError::DeleteFailed {
                path: path.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Lists object paths under a prefix
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>, ArtifactError> {
        let key = Self::object_path(prefix)?;
        let mut stream = self.store.list(Some(&key));
        let mut paths = Vec::new();

        while let Some(entry) = stream.next().await {
            let meta = entry.map_err(|e| ArtifactError::ListFailed {
                prefix: prefix.to_string(),
                message: e.to_string(),
            })?;
            paths.push(meta.location.to_string());
        }

        Ok(paths)
    }

    /// Deletes every object under a prefix, returning how many were removed
    pub async fn delete_prefix(&self, prefix: &str) -> Result<usize, ArtifactError> {
        let paths = self.list(prefix).await?;
        let mut removed = 0;
        for path in &paths {
            self.delete(path).await?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Stable retrieval link for an object in the permanent area
    pub fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url, path)
    }
}

impl std::fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("public_base_url", &self.public_base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_helpers() {
        assert_eq!(
            staged_import_path("j1", "schools.xlsx"),
            "temp-imports/j1/schools.xlsx"
        );
        assert_eq!(
            temp_export_path("j1", "report.xlsx"),
            "temp-exports/j1/temp_report.xlsx"
        );
        assert_eq!(
            final_export_path("admin-7", "report.xlsx"),
            "exports/admin-7/report.xlsx"
        );
    }

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let store = ArtifactStore::in_memory();
        store
            .put("temp-imports/j1/data.xlsx", Bytes::from_static(b"abc"))
            .await
            .unwrap();

        let bytes = store.get("temp-imports/j1/data.xlsx").await.unwrap();
        assert_eq!(&bytes[..], b"abc");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = ArtifactStore::in_memory();
        let err = store.get("temp-imports/j1/missing.xlsx").await.unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound(_)));

        let opt = store.get_opt("temp-imports/j1/missing.xlsx").await.unwrap();
        assert!(opt.is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = ArtifactStore::in_memory();
        store
            .put("temp-exports/j1/temp_r.xlsx", Bytes::from_static(b"x"))
            .await
            .unwrap();

        store.delete("temp-exports/j1/temp_r.xlsx").await.unwrap();
        // Second delete of a now-missing object succeeds.
        store.delete("temp-exports/j1/temp_r.xlsx").await.unwrap();
        assert!(store.get_opt("temp-exports/j1/temp_r.xlsx").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_prefix_scopes_to_job() {
        let store = ArtifactStore::in_memory();
        store
            .put("temp-imports/j1/a.xlsx", Bytes::from_static(b"1"))
            .await
            .unwrap();
        store
            .put("temp-imports/j1/b.xlsx", Bytes::from_static(b"2"))
            .await
            .unwrap();
        store
            .put("temp-imports/j2/c.xlsx", Bytes::from_static(b"3"))
            .await
            .unwrap();

        let removed = store.delete_prefix("temp-imports/j1").await.unwrap();
        assert_eq!(removed, 2);
        assert!(store.get_opt("temp-imports/j1/a.xlsx").await.unwrap().is_none());
        assert!(store.get_opt("temp-imports/j2/c.xlsx").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_public_url_joins_base_and_path() {
        let store = ArtifactStore::new(Arc::new(InMemory::new()), "https://files.example.com/");
        assert_eq!(
            store.public_url("exports/admin-7/report.xlsx"),
            "https://files.example.com/exports/admin-7/report.xlsx"
        );
    }

    #[tokio::test]
    async fn test_local_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::local(dir.path(), "file://artifacts").unwrap();

        store
            .put("exports/u1/r.xlsx", Bytes::from_static(b"data"))
            .await
            .unwrap();
        let bytes = store.get("exports/u1/r.xlsx").await.unwrap();
        assert_eq!(&bytes[..], b"data");
    }
}
