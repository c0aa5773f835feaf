//! Destination table store adapters
//!
//! The destination data store is the external collaborator receiving
//! imported rows. It is consumed through two batch write operations: a plain
//! insert and an upsert keyed by a declared conflict-resolution field. The
//! relational backend itself is out of scope; the in-memory implementation
//! backs tests and demo runs.

use crate::domain::ids::TableName;
use crate::domain::row::RowRecord;
use crate::domain::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Destination table write interface
///
/// A batch either lands whole or fails whole; the import processor records a
/// failed batch as one error entry and continues with the next chunk.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Inserts a batch of rows into a table
    async fn insert_rows(&self, table: &TableName, rows: &[RowRecord]) -> Result<()>;

    /// Inserts or updates a batch of rows, matching on `key_field`
    async fn upsert_rows(
        &self,
        table: &TableName,
        key_field: &str,
        rows: &[RowRecord],
    ) -> Result<()>;
}

/// In-memory destination table store
///
/// Stores each table as a list of JSON objects. Upserts replace the first
/// row whose key field matches; rows without a key value are appended.
#[derive(Default)]
pub struct MemoryTableStore {
    tables: RwLock<HashMap<String, Vec<serde_json::Value>>>,
}

impl MemoryTableStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held by a table
    pub async fn row_count(&self, table: &TableName) -> usize {
        self.tables
            .read()
            .await
            .get(table.as_str())
            .map(|rows| rows.len())
            .unwrap_or(0)
    }

    /// Snapshot of a table's rows
    pub async fn rows(&self, table: &TableName) -> Vec<serde_json::Value> {
        self.tables
            .read()
            .await
            .get(table.as_str())
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn insert_rows(&self, table: &TableName, rows: &[RowRecord]) -> Result<()> {
        let mut tables = self.tables.write().await;
        let entries = tables.entry(table.as_str().to_string()).or_default();
        entries.extend(rows.iter().map(|r| r.to_json()));
        Ok(())
    }

    async fn upsert_rows(
        &self,
        table: &TableName,
        key_field: &str,
        rows: &[RowRecord],
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        let entries = tables.entry(table.as_str().to_string()).or_default();

        for row in rows {
            let incoming = row.to_json();
            let key = incoming.get(key_field).cloned();
            let existing = key.as_ref().filter(|k| !k.is_null()).and_then(|k| {
                entries
                    .iter_mut()
                    .find(|e| e.get(key_field) == Some(k))
            });

            match existing {
                Some(slot) => *slot = incoming,
                None => entries.push(incoming),
            }
        }

        Ok(())
    }
}
