//! Import processor
//!
//! Consumes a staged spreadsheet within one invocation: decodes the whole
//! file, iterates it in planner-sized chunks, writes each chunk to the
//! destination table and persists the job record after every chunk. Chunking
//! here governs progress granularity and partial-failure isolation, not
//! resumability: a resume request restarts the run from the beginning, which
//! re-attempts every row (only an upsert destination makes that idempotent).

use crate::adapters::artifacts::{staged_import_path, ArtifactStore};
use crate::adapters::codec;
use crate::adapters::jobs::JobStore;
use crate::adapters::tables::TableStore;
use crate::core::chunk::{percent, ChunkPlanner};
use crate::domain::errors::{ArtifactError, TabulaError};
use crate::domain::ids::JobId;
use crate::domain::job::{ImportJob, RowError};
use crate::domain::row::RowRecord;
use crate::domain::Result;
use std::sync::Arc;

/// Result of one completed import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Total data rows in the source file
    pub total: u64,
    /// Rows that landed in the destination table
    pub processed: u64,
    /// Final progress (always 100 on a completed run)
    pub progress: u8,
    /// Number of accumulated error entries
    pub error_count: usize,
}

/// Chunked, single-invocation import processor
pub struct ImportProcessor {
    jobs: Arc<dyn JobStore>,
    tables: Arc<dyn TableStore>,
    artifacts: ArtifactStore,
    planner: ChunkPlanner,
}

impl ImportProcessor {
    /// Creates a new import processor
    pub fn new(
        jobs: Arc<dyn JobStore>,
        tables: Arc<dyn TableStore>,
        artifacts: ArtifactStore,
        planner: ChunkPlanner,
    ) -> Self {
        Self {
            jobs,
            tables,
            artifacts,
            planner,
        }
    }

    /// Runs an import job to completion (or failure) within this invocation
    ///
    /// Looks up the job record and its staged source file, then processes
    /// every chunk in ascending order. Row-level and batch-level failures are
    /// accumulated on the record and do not abort the run; any other failure
    /// marks the job `error` and leaves the staged file in place for
    /// diagnosis or a manual resume.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the job record or the staged source file is
    /// missing (job state is not mutated in either case), or the underlying
    /// fault after the job has been marked `error`.
    pub async fn run(&self, job_id: &JobId) -> Result<ImportOutcome> {
        let mut job = self
            .jobs
            .load_import(job_id)
            .await?
            .ok_or_else(|| TabulaError::NotFound(format!("import job {job_id}")))?;

        let staged = staged_import_path(job_id.as_str(), &job.file_name);
        let bytes = match self.artifacts.get(&staged).await {
            Ok(bytes) => bytes,
            Err(ArtifactError::NotFound(_)) => {
                return Err(TabulaError::NotFound(format!("staged source file {staged}")));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            job_id = %job.id,
            table = %job.table_name,
            file_name = %job.file_name,
            size_bytes = bytes.len(),
            "Starting import run"
        );

        match self.process(&mut job, &bytes, &staged).await {
            Ok(outcome) => {
                tracing::info!(
                    job_id = %job.id,
                    total = outcome.total,
                    processed = outcome.processed,
                    errors = outcome.error_count,
                    "Import run complete"
                );
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!(job_id = %job.id, error = %e, "Import run failed");
                job.mark_error(e.to_string());
                if let Err(save_err) = self.jobs.save_import(&job).await {
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

    async fn process(
        &self,
        job: &mut ImportJob,
        bytes: &[u8],
        staged: &str,
    ) -> Result<ImportOutcome> {
        job.mark_processing();
        self.jobs.save_import(job).await?;

        let workbook = codec::decode(bytes)?;
        let records = workbook.records();
        let total = records.len() as u64;

        job.total_rows = total;
        job.touch();
        self.jobs.save_import(job).await?;

        let total_chunks = self.planner.total_chunks(total);
        let mut failed_rows: u64 = 0;

        for span in self.planner.spans(total) {
            let mut batch: Vec<RowRecord> = Vec::with_capacity(span.len() as usize);

            for (i, record) in records[span.start as usize..span.end as usize]
                .iter()
                .enumerate()
            {
                // 1-based source row number; the header occupies row 1.
                let source_row = span.start + i as u64 + 2;
                if record.is_blank() {
                    job.errors.push(RowError {
                        row: source_row,
                        message: "Row is empty".to_string(),
                    });
                    failed_rows += 1;
                } else {
                    batch.push(record.clone());
                }
            }

            if !batch.is_empty() {
                if let Err(e) = self.write_batch(job, &batch).await {
                    tracing::warn!(
                        job_id = %job.id,
                        chunk = span.index,
                        rows = batch.len(),
                        error = %e,
                        "Batch write failed, continuing with next chunk"
                    );
                    job.errors.push(RowError {
                        row: span.start + 2,
                        message: format!("Batch write failed: {e}"),
                    });
                    failed_rows += batch.len() as u64;
                }
            }

            job.processed_rows = span.end;
            job.progress = percent(span.index + 1, total_chunks);
            job.touch();
            self.jobs.save_import(job).await?;

            tracing::debug!(
                job_id = %job.id,
                chunk = span.index,
                progress = job.progress,
                processed = job.processed_rows,
                "Chunk persisted"
            );
        }

        job.processed_rows = total - failed_rows;
        job.mark_complete();
        self.jobs.save_import(job).await?;

        self.artifacts.delete(staged).await?;

        Ok(ImportOutcome {
            total,
            processed: job.processed_rows,
            progress: job.progress,
            error_count: job.errors.len(),
        })
    }

    async fn write_batch(&self, job: &ImportJob, batch: &[RowRecord]) -> Result<()> {
        match (job.with_upsert, job.key_field.as_deref()) {
            (true, Some(key_field)) => {
                self.tables
                    .upsert_rows(&job.table_name, key_field, batch)
                    .await
            }
            _ => self.tables.insert_rows(&job.table_name, batch).await,
        }
    }
}
