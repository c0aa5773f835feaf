//! Action dispatch and request protocol
//!
//! The controller is the single entry point of the processor: it parses a
//! JSON request envelope, dispatches on the `action` field and renders every
//! outcome (including failures) as a status code plus JSON body, the way an
//! HTTP-fronted invocation would return it.

use crate::adapters::artifacts::{ArtifactStore, TEMP_EXPORTS_PREFIX, TEMP_IMPORTS_PREFIX};
use crate::adapters::jobs::JobStore;
use crate::adapters::tables::TableStore;
use crate::core::chunk::ChunkPlanner;
use crate::core::export::{ExportAccumulator, ExportBatch, ExportOutcome};
use crate::core::import::{ImportOutcome, ImportProcessor};
use crate::domain::errors::TabulaError;
use crate::domain::ids::JobId;
use crate::domain::Result;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// Requested operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobAction {
    /// Run an import job to completion
    Process,
    /// Re-run a previously failed or interrupted import job
    Resume,
    /// Cancel an import job and discard its temporary artifacts
    Cancel,
    /// Accept the first batch of an export
    Export,
    /// Accept a follow-up batch of an export
    ExportBatch,
}

/// Parsed request envelope
///
/// Import actions use only `action` and `job_id`; export actions carry the
/// batch payload fields as well. Unknown fields are ignored, an unknown
/// `action` is rejected at parse time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    /// Requested operation
    pub action: JobAction,

    /// Job the request addresses
    pub job_id: String,

    /// Export column order, required on the creating export call
    #[serde(default)]
    pub headers: Vec<String>,

    /// Export artifact name, required on the creating export call
    #[serde(default)]
    pub file_name: Option<String>,

    /// Export rows as JSON objects keyed by column name
    #[serde(default)]
    pub data_batch: Vec<serde_json::Map<String, serde_json::Value>>,

    /// Declared export total, required on the creating export call
    #[serde(default)]
    pub total_rows: Option<u64>,

    /// 0-based position of the export batch; defaults to 0
    #[serde(default)]
    pub batch_index: Option<u64>,

    /// Whether further export batches follow; defaults to false
    #[serde(default)]
    pub has_more_batches: Option<bool>,

    /// Identity of the initiating actor; defaults to `system`
    #[serde(default)]
    pub created_by: Option<String>,
}

impl JobRequest {
    /// Parses a request envelope from a JSON body
    ///
    /// # Errors
    ///
    /// Returns `Protocol` (a 400) for malformed JSON, a missing required
    /// field or an unrecognized action.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| TabulaError::Protocol(format!("malformed request: {e}")))
    }
}

/// Successful response body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessBody {
    /// Always true
    pub success: bool,
    /// Rows handled so far
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed: Option<u64>,
    /// Current progress, 0-100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    /// Total rows of the job
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Whether the job reached its terminal successful state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
    /// Retrieval link of a finalized export
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// Response body variants
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// Successful outcome
    Success(SuccessBody),
    /// Failed outcome
    Error {
        /// Error message
        error: String,
    },
}

/// Rendered response: a status code plus a JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct JobResponse {
    /// HTTP-style status code
    pub status: u16,
    /// Response body
    pub body: ResponseBody,
}

impl JobResponse {
    fn ok(body: SuccessBody) -> Self {
        Self {
            status: 200,
            body: ResponseBody::Success(body),
        }
    }

    fn from_import(outcome: ImportOutcome) -> Self {
        Self::ok(SuccessBody {
            success: true,
            processed: Some(outcome.processed),
            progress: Some(outcome.progress),
            total: Some(outcome.total),
            is_complete: Some(true),
            download_url: None,
        })
    }

    fn from_export(outcome: ExportOutcome) -> Self {
        Self::ok(SuccessBody {
            success: true,
            processed: Some(outcome.processed),
            progress: Some(outcome.progress),
            total: Some(outcome.total),
            is_complete: Some(outcome.is_complete),
            download_url: outcome.download_url,
        })
    }

    fn from_error(error: &TabulaError) -> Self {
        Self {
            status: error.status_code(),
            body: ResponseBody::Error {
                error: error.to_string(),
            },
        }
    }

    /// Whether the response reports success
    pub fn is_success(&self) -> bool {
        matches!(self.body, ResponseBody::Success(_))
    }

    /// Serializes the body as JSON
    pub fn body_json(&self) -> String {
        serde_json::to_string(&self.body).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Action dispatcher over the processor's collaborators
pub struct JobController {
    jobs: Arc<dyn JobStore>,
    artifacts: ArtifactStore,
    import: ImportProcessor,
    export: ExportAccumulator,
}

impl JobController {
    /// Wires a controller over the given collaborators
    pub fn new(
        jobs: Arc<dyn JobStore>,
        tables: Arc<dyn TableStore>,
        artifacts: ArtifactStore,
        planner: ChunkPlanner,
    ) -> Self {
        let import = ImportProcessor::new(jobs.clone(), tables, artifacts.clone(), planner);
        let export = ExportAccumulator::new(jobs.clone(), artifacts.clone(), planner);
        Self {
            jobs,
            artifacts,
            import,
            export,
        }
    }

    /// Handles a raw JSON request body
    ///
    /// Never fails: parse and dispatch errors render as error responses.
    pub async fn handle_json(&self, body: &str) -> JobResponse {
        match JobRequest::from_json(body) {
            Ok(request) => self.handle(request).await,
            Err(e) => JobResponse::from_error(&e),
        }
    }

    /// Handles a parsed request
    pub async fn handle(&self, request: JobRequest) -> JobResponse {
        match self.dispatch(request).await {
            Ok(response) => response,
            Err(e) => JobResponse::from_error(&e),
        }
    }

    async fn dispatch(&self, request: JobRequest) -> Result<JobResponse> {
        let job_id = JobId::from_str(&request.job_id)
            .map_err(|e| TabulaError::Protocol(e.to_string()))?;

        tracing::info!(action = ?request.action, job_id = %job_id, "Dispatching request");

        match request.action {
            JobAction::Process | JobAction::Resume => {
                let outcome = self.import.run(&job_id).await?;
                Ok(JobResponse::from_import(outcome))
            }
            JobAction::Cancel => {
                self.cancel(&job_id).await?;
                Ok(JobResponse::ok(SuccessBody {
                    success: true,
                    processed: None,
                    progress: None,
                    total: None,
                    is_complete: None,
                    download_url: None,
                }))
            }
            JobAction::Export | JobAction::ExportBatch => {
                let batch = ExportBatch {
                    job_id,
                    file_name: request.file_name,
                    headers: request.headers,
                    total_rows: request.total_rows,
                    rows: request.data_batch,
                    batch_index: request.batch_index.unwrap_or(0),
                    has_more_batches: request.has_more_batches.unwrap_or(false),
                    created_by: request.created_by,
                };
                let outcome = self.export.accept(batch).await?;
                Ok(JobResponse::from_export(outcome))
            }
        }
    }

    /// Cancels an import job and removes its temporary artifacts
    ///
    /// Cancellation is data-level only: a concurrently running invocation is
    /// not interrupted, it simply loses its staged inputs and will fail on
    /// its next artifact access.
    async fn cancel(&self, job_id: &JobId) -> Result<()> {
        let mut job = self
            .jobs
            .load_import(job_id)
            .await?
            .ok_or_else(|| TabulaError::NotFound(format!("import job {job_id}")))?;

        job.mark_error("Job canceled by user");
        self.jobs.save_import(&job).await?;

        let imports = self
            .artifacts
            .delete_prefix(&format!("{TEMP_IMPORTS_PREFIX}/{job_id}"))
            .await?;
        let exports = self
            .artifacts
            .delete_prefix(&format!("{TEMP_EXPORTS_PREFIX}/{job_id}"))
            .await?;

        tracing::info!(
            job_id = %job_id,
            removed = imports + exports,
            "Canceled job and removed temporary artifacts"
        );
        Ok(())
    }
}
