//! Export accumulator
//!
//! Builds an export artifact across many short invocations. Each call carries
//! one batch of already-queried rows; the accumulator splices the batch into
//! a temporary artifact at the batch's fixed offset, persists the artifact
//! and the job record, and finalizes on the call that declares no further
//! batches remain. Batches may arrive out of order or be retried: offsets are
//! derived from the batch index, so a replay overwrites its own region. Once
//! the job has reached a terminal state further batches are rejected without
//! touching the record.

use crate::adapters::artifacts::{final_export_path, temp_export_path, ArtifactStore};
use crate::adapters::codec;
use crate::adapters::jobs::JobStore;
use crate::core::chunk::{percent, ChunkPlanner};
use crate::domain::errors::TabulaError;
use crate::domain::ids::JobId;
use crate::domain::job::ExportJob;
use crate::domain::row::CellValue;
use crate::domain::workbook::Workbook;
use crate::domain::Result;
use bytes::Bytes;
use std::sync::Arc;

/// One batch of rows destined for an export artifact
#[derive(Debug, Clone)]
pub struct ExportBatch {
    /// Job the batch belongs to
    pub job_id: JobId,
    /// Target artifact name; required when the batch creates the job
    pub file_name: Option<String>,
    /// Column order; required when the batch creates the artifact
    pub headers: Vec<String>,
    /// Total rows the caller will send; required when the batch creates the job
    pub total_rows: Option<u64>,
    /// Rows as JSON objects keyed by column name
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,
    /// 0-based position of this batch in the overall sequence
    pub batch_index: u64,
    /// Whether further batches will follow this one
    pub has_more_batches: bool,
    /// Identity of the initiating actor, used on job creation only
    pub created_by: Option<String>,
}

/// Result of one accepted export batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// Rows accumulated so far
    pub processed: u64,
    /// Progress after this batch
    pub progress: u8,
    /// Declared total rows
    pub total: u64,
    /// Whether this batch finalized the artifact
    pub is_complete: bool,
    /// Retrieval link, present once finalized
    pub download_url: Option<String>,
}

/// Cross-invocation export artifact builder
pub struct ExportAccumulator {
    jobs: Arc<dyn JobStore>,
    artifacts: ArtifactStore,
    planner: ChunkPlanner,
}

impl ExportAccumulator {
    /// Creates a new export accumulator
    pub fn new(jobs: Arc<dyn JobStore>, artifacts: ArtifactStore, planner: ChunkPlanner) -> Self {
        Self {
            jobs,
            artifacts,
            planner,
        }
    }

    /// Accepts one batch, updating the temporary artifact and the job record
    ///
    /// Creates the job record on first contact. On the final batch the
    /// artifact is copied to the permanent area, the job is completed with
    /// its retrieval link and the temporary artifact is removed.
    ///
    /// # Errors
    ///
    /// Returns `Protocol` if a creating batch omits `file_name`, `total_rows`
    /// or `headers`, or if the job is already in a terminal state (a retried
    /// batch arriving after finalization is rejected without touching the
    /// record); any other failure marks the job `error` before the underlying
    /// fault is returned.
    pub async fn accept(&self, batch: ExportBatch) -> Result<ExportOutcome> {
        let mut job = match self.jobs.load_export(&batch.job_id).await? {
            Some(job) if job.status.is_terminal() => {
                return Err(TabulaError::Protocol(format!(
                    "export job {} is already in terminal state {:?}",
                    job.id, job.status
                )));
            }
            Some(job) => job,
            None => {
                let file_name = batch.file_name.clone().ok_or_else(|| {
                    TabulaError::Protocol("fileName is required on the first export call".into())
                })?;
                let total_rows = batch.total_rows.ok_or_else(|| {
                    TabulaError::Protocol("totalRows is required on the first export call".into())
                })?;
                let created_by = batch.created_by.clone().unwrap_or_else(|| "system".into());
                let job = ExportJob::new(batch.job_id.clone(), file_name, total_rows, created_by);
                self.jobs.save_export(&job).await?;
                tracing::info!(
                    job_id = %job.id,
                    file_name = %job.file_name,
                    total_rows = job.total_rows,
                    "Created export job"
                );
                job
            }
        };

        match self.apply(&mut job, &batch).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::error!(job_id = %job.id, error = %e, "Export batch failed");
                job.mark_error(e.to_string());
                if let Err(save_err) = self.jobs.save_export(&job).await {
                    tracing::warn!(
                        job_id = %job.id,
                        error = %save_err,
                        "Failed to persist error state"
                    );
                }
                Err(e)
            }
        }
    }

    async fn apply(&self, job: &mut ExportJob, batch: &ExportBatch) -> Result<ExportOutcome> {
        let temp = temp_export_path(job.id.as_str(), &job.file_name);

        let mut workbook = match self.artifacts.get_opt(&temp).await? {
            Some(bytes) => codec::decode(&bytes)?,
            None => {
                if batch.headers.is_empty() {
                    return Err(TabulaError::Protocol(
                        "headers are required on the first export call".into(),
                    ));
                }
                Workbook::new(batch.headers.clone())
            }
        };

        let columns: Vec<String> = workbook.columns().to_vec();
        let block: Vec<Vec<CellValue>> = batch
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|col| row.get(col).map(CellValue::from_json).unwrap_or_default())
                    .collect()
            })
            .collect();

        // output_row is 1-based over data rows; the workbook indexes data
        // rows from 0.
        let offset = (self.planner.output_row(batch.batch_index) - 1) as usize;
        workbook.write_rows_at(offset, block);

        let bytes = Bytes::from(codec::encode(&workbook)?);
        self.artifacts.put(&temp, bytes.clone()).await?;

        job.processed_rows += batch.rows.len() as u64;
        job.progress = if batch.has_more_batches {
            // 100 is reserved for the finalized artifact.
            percent(job.processed_rows, job.total_rows).min(99)
        } else {
            job.progress
        };
        job.touch();
        self.jobs.save_export(job).await?;

        tracing::debug!(
            job_id = %job.id,
            batch_index = batch.batch_index,
            rows = batch.rows.len(),
            processed = job.processed_rows,
            progress = job.progress,
            "Export batch persisted"
        );

        if batch.has_more_batches {
            return Ok(ExportOutcome {
                processed: job.processed_rows,
                progress: job.progress,
                total: job.total_rows,
                is_complete: false,
                download_url: None,
            });
        }

        let final_path = final_export_path(&job.created_by, &job.file_name);
        self.artifacts.put(&final_path, bytes).await?;
        let url = self.artifacts.public_url(&final_path);
        job.mark_complete(url.clone());
        self.jobs.save_export(job).await?;
        self.artifacts.delete(&temp).await?;

        tracing::info!(
            job_id = %job.id,
            path = %final_path,
            rows = job.processed_rows,
            "Export finalized"
        );

        Ok(ExportOutcome {
            processed: job.processed_rows,
            progress: job.progress,
            total: job.total_rows,
            is_complete: true,
            download_url: Some(url),
        })
    }
}
