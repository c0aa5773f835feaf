//! Job record models
//!
//! This module defines the persisted representation of one import or export
//! operation and its live progress. Job records are the only cross-invocation
//! state the processor keeps besides the temporary artifact itself: each
//! invocation reads the record, performs bounded work and persists the new
//! state before returning.

use crate::domain::ids::{JobId, TableName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Job lifecycle status
///
/// `Waiting` is the state a client creates a job in; the first invocation
/// moves it to `Processing`. `Complete` and `Error` are terminal and are
/// never reopened except by an external resume request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Created, not yet picked up by an invocation
    #[default]
    Waiting,
    /// An invocation is (or was last seen) working on the job
    Processing,
    /// All rows handled; terminal
    Complete,
    /// Failed or canceled; terminal
    Error,
}

impl JobStatus {
    /// Whether the status is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Error)
    }
}

/// A row-attributed import error
///
/// `row` is the 1-based source row number including the header row, so the
/// first data row is row 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based source row number (header row is row 1)
    pub row: u64,
    /// Error message
    pub message: String,
}

/// An export error entry
///
/// Export errors are not attributed to rows; only the message is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMessage {
    /// Error message
    pub message: String,
}

/// Persisted record of one import operation
///
/// Created by the client with `status = waiting` before the processor is
/// invoked; the processor mutates and persists it after every chunk so that
/// a poller observes progress monotonically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJob {
    /// Opaque job identifier, primary key
    pub id: JobId,

    /// Lifecycle status
    pub status: JobStatus,

    /// 0-100, monotonically non-decreasing while processing
    pub progress: u8,

    /// Total data rows in the source file; 0 until the file has been decoded
    pub total_rows: u64,

    /// Rows attempted (successful or failed) so far
    pub processed_rows: u64,

    /// Accumulated row and batch errors, append-only within a run
    pub errors: Vec<RowError>,

    /// Name of the staged source artifact
    pub file_name: String,

    /// Destination collection
    pub table_name: TableName,

    /// Whether batch writes use upsert-by-key semantics
    pub with_upsert: bool,

    /// Conflict-resolution key when `with_upsert` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_field: Option<String>,

    /// Identity of the initiating actor
    pub created_by: String,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last persisted
    pub updated_at: DateTime<Utc>,
}

impl ImportJob {
    /// Creates a new import job in the `Waiting` state
    pub fn new(
        id: JobId,
        file_name: impl Into<String>,
        table_name: TableName,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: JobStatus::Waiting,
            progress: 0,
            total_rows: 0,
            processed_rows: 0,
            errors: Vec::new(),
            file_name: file_name.into(),
            table_name,
            with_upsert: false,
            key_field: None,
            created_by: created_by.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Enables upsert-by-key writes for this job
    pub fn with_upsert_key(mut self, key_field: impl Into<String>) -> Self {
        self.with_upsert = true;
        self.key_field = Some(key_field.into());
        self
    }

    /// Marks the job as picked up by an invocation
    pub fn mark_processing(&mut self) {
        self.status = JobStatus::Processing;
        self.progress = 0;
        self.processed_rows = 0;
        self.errors.clear();
        self.touch();
    }

    /// Marks the job complete
    pub fn mark_complete(&mut self) {
        self.status = JobStatus::Complete;
        self.progress = 100;
        self.touch();
    }

    /// Marks the job failed with a single synthetic error entry
    pub fn mark_error(&mut self, message: impl Into<String>) {
        self.status = JobStatus::Error;
        self.errors.push(RowError {
            row: 0,
            message: message.into(),
        });
        self.touch();
    }

    /// Updates the last-persisted timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Persisted record of one export operation
///
/// Created implicitly on the first batch invocation if absent; finalized
/// exactly once, on the invocation that reports no further batches remain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportJob {
    /// Opaque job identifier, primary key
    pub id: JobId,

    /// Lifecycle status
    pub status: JobStatus,

    /// 0-100, monotonically non-decreasing while processing
    pub progress: u8,

    /// Total rows the caller declared up front
    pub total_rows: u64,

    /// Rows appended to the output artifact so far
    pub processed_rows: u64,

    /// Target artifact name
    pub file_name: String,

    /// Stable retrieval link, populated only once complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,

    /// Accumulated errors
    pub errors: Vec<JobMessage>,

    /// Identity of the initiating actor
    pub created_by: String,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last persisted
    pub updated_at: DateTime<Utc>,
}

impl ExportJob {
    /// Creates a new export job in the `Processing` state
    ///
    /// Export jobs skip `Waiting` because they are created by the first
    /// batch invocation itself.
    pub fn new(
        id: JobId,
        file_name: impl Into<String>,
        total_rows: u64,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: JobStatus::Processing,
            progress: 0,
            total_rows,
            processed_rows: 0,
            file_name: file_name.into(),
            download_url: None,
            errors: Vec::new(),
            created_by: created_by.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Finalizes the job with its permanent retrieval link
    pub fn mark_complete(&mut self, download_url: impl Into<String>) {
        self.status = JobStatus::Complete;
        self.progress = 100;
        self.download_url = Some(download_url.into());
        self.touch();
    }

    /// Marks the job failed with a single error entry
    pub fn mark_error(&mut self, message: impl Into<String>) {
        self.status = JobStatus::Error;
        self.errors.push(JobMessage {
            message: message.into(),
        });
        self.touch();
    }

    /// Updates the last-persisted timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
