//! End-to-end import flow tests
//!
//! Drives whole import jobs through the action dispatcher and asserts on the
//! persisted job records, the destination table and the artifact store.

use async_trait::async_trait;
use bytes::Bytes;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tabula::adapters::artifacts::{staged_import_path, ArtifactStore};
use tabula::adapters::codec;
use tabula::adapters::jobs::{FsJobStore, JobStore, MemoryJobStore};
use tabula::adapters::tables::MemoryTableStore;
use tabula::core::chunk::ChunkPlanner;
use tabula::core::controller::JobController;
use tabula::domain::{
    CellValue, ExportJob, ImportJob, JobId, JobStatus, Result, TableName, Workbook,
};

fn workbook(rows: usize) -> Workbook {
    let columns = vec!["code".to_string(), "name".to_string()];
    let data = (0..rows)
        .map(|i| {
            vec![
                CellValue::Number(i as f64),
                CellValue::Text(format!("school-{i}")),
            ]
        })
        .collect();
    Workbook::with_rows(columns, data)
}

fn import_job(id: &str) -> ImportJob {
    ImportJob::new(
        JobId::from_str(id).unwrap(),
        "schools.xlsx",
        TableName::from_str("schools").unwrap(),
        "admin-1",
    )
}

/// Job store wrapper that records every persisted import snapshot, so tests
/// can assert on the progress a poller would have observed.
struct RecordingJobStore {
    inner: MemoryJobStore,
    snapshots: Mutex<Vec<(u8, u64)>>,
}

impl RecordingJobStore {
    fn new() -> Self {
        Self {
            inner: MemoryJobStore::new(),
            snapshots: Mutex::new(Vec::new()),
        }
    }

    fn snapshots(&self) -> Vec<(u8, u64)> {
        self.snapshots.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobStore for RecordingJobStore {
    async fn load_import(&self, id: &JobId) -> Result<Option<ImportJob>> {
        self.inner.load_import(id).await
    }

    async fn save_import(&self, job: &ImportJob) -> Result<()> {
        self.snapshots
            .lock()
            .unwrap()
            .push((job.progress, job.processed_rows));
        self.inner.save_import(job).await
    }

    async fn load_export(&self, id: &JobId) -> Result<Option<ExportJob>> {
        self.inner.load_export(id).await
    }

    async fn save_export(&self, job: &ExportJob) -> Result<()> {
        self.inner.save_export(job).await
    }
}

async fn stage(jobs: &dyn JobStore, artifacts: &ArtifactStore, id: &str, book: &Workbook) {
    jobs.save_import(&import_job(id)).await.unwrap();
    let bytes = codec::encode(book).unwrap();
    artifacts
        .put(&staged_import_path(id, "schools.xlsx"), Bytes::from(bytes))
        .await
        .unwrap();
}

fn controller_over(jobs: Arc<dyn JobStore>, artifacts: ArtifactStore) -> JobController {
    JobController::new(
        jobs,
        Arc::new(MemoryTableStore::new()),
        artifacts,
        ChunkPlanner::new(1000),
    )
}

#[tokio::test]
async fn test_large_import_persists_chunked_progress() {
    let jobs = Arc::new(RecordingJobStore::new());
    let artifacts = ArtifactStore::in_memory();
    stage(jobs.as_ref(), &artifacts, "j1", &workbook(2500)).await;

    let controller = controller_over(jobs.clone(), artifacts.clone());
    let response = controller
        .handle_json(r#"{"action": "process", "jobId": "j1"}"#)
        .await;
    assert_eq!(response.status, 200);

    let job = jobs
        .load_import(&JobId::from_str("j1").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.status, JobStatus::Complete);
    assert_eq!(job.progress, 100);
    assert_eq!(job.total_rows, 2500);
    assert_eq!(job.processed_rows, 2500);
    assert!(job.errors.is_empty());

    // 2500 rows at chunk size 1000 persist after each of 3 chunks; the
    // chunk-boundary progress values a poller could observe are 33, 67, 100.
    let snapshots = jobs.snapshots();
    let progresses: Vec<u8> = snapshots.iter().map(|(p, _)| *p).collect();
    assert!(progresses.contains(&33));
    assert!(progresses.contains(&67));
    assert_eq!(*progresses.last().unwrap(), 100);

    // Both progress and processed-row counts are monotonically non-decreasing
    // after the run starts.
    for window in snapshots.windows(2) {
        // mark_processing resets to zero once, at the start.
        if window[1] == (0, 0) {
            continue;
        }
        assert!(window[1].0 >= window[0].0, "progress regressed: {snapshots:?}");
        assert!(
            window[1].1 >= window[0].1,
            "processed count regressed: {snapshots:?}"
        );
    }

    // Staged source file removed on completion.
    assert!(artifacts
        .get_opt(&staged_import_path("j1", "schools.xlsx"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_blank_row_recorded_with_spreadsheet_row_number() {
    let jobs = Arc::new(MemoryJobStore::new());
    let artifacts = ArtifactStore::in_memory();

    let mut book = workbook(2500);
    // Data row index 1500 is spreadsheet row 1502 (header row plus 1-based).
    book.write_rows_at(1500, vec![vec![CellValue::Null, CellValue::Null]]);
    stage(jobs.as_ref(), &artifacts, "j1", &book).await;

    let controller = controller_over(jobs.clone(), artifacts);
    let response = controller
        .handle_json(r#"{"action": "process", "jobId": "j1"}"#)
        .await;
    assert_eq!(response.status, 200);

    let job = jobs
        .load_import(&JobId::from_str("j1").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.status, JobStatus::Complete);
    assert_eq!(job.total_rows, 2500);
    assert_eq!(job.processed_rows, 2499);
    assert_eq!(job.errors.len(), 1);
    assert_eq!(job.errors[0].row, 1502);
    assert_eq!(job.errors[0].message, "Row is empty");
}

#[tokio::test]
async fn test_upsert_import_writes_through_key_field() {
    let jobs = Arc::new(MemoryJobStore::new());
    let artifacts = ArtifactStore::in_memory();
    let tables = Arc::new(MemoryTableStore::new());

    let job = import_job("j1").with_upsert_key("code");
    jobs.save_import(&job).await.unwrap();
    let bytes = codec::encode(&workbook(10)).unwrap();
    artifacts
        .put(&staged_import_path("j1", "schools.xlsx"), Bytes::from(bytes))
        .await
        .unwrap();

    let controller = JobController::new(
        jobs.clone(),
        tables.clone(),
        artifacts.clone(),
        ChunkPlanner::new(1000),
    );

    // Two full runs over the same data stay idempotent under upsert.
    for _ in 0..2 {
        let bytes = codec::encode(&workbook(10)).unwrap();
        artifacts
            .put(&staged_import_path("j1", "schools.xlsx"), Bytes::from(bytes))
            .await
            .unwrap();
        let response = controller
            .handle_json(r#"{"action": "process", "jobId": "j1"}"#)
            .await;
        assert_eq!(response.status, 200);
    }

    assert_eq!(
        tables.row_count(&TableName::from_str("schools").unwrap()).await,
        10
    );
}

#[tokio::test]
async fn test_failed_import_can_be_resumed() {
    let jobs = Arc::new(MemoryJobStore::new());
    let artifacts = ArtifactStore::in_memory();
    let job_id = JobId::from_str("j1").unwrap();

    jobs.save_import(&import_job("j1")).await.unwrap();
    artifacts
        .put(
            &staged_import_path("j1", "schools.xlsx"),
            Bytes::from_static(b"corrupt"),
        )
        .await
        .unwrap();

    let controller = controller_over(jobs.clone(), artifacts.clone());
    let response = controller
        .handle_json(r#"{"action": "process", "jobId": "j1"}"#)
        .await;
    assert_eq!(response.status, 500);

    let failed = jobs.load_import(&job_id).await.unwrap().unwrap();
    assert_eq!(failed.status, JobStatus::Error);
    // Staged file kept so the job can be retried.
    assert!(artifacts
        .get_opt(&staged_import_path("j1", "schools.xlsx"))
        .await
        .unwrap()
        .is_some());

    // Replace the artifact with a readable file and resume.
    let bytes = codec::encode(&workbook(5)).unwrap();
    artifacts
        .put(&staged_import_path("j1", "schools.xlsx"), Bytes::from(bytes))
        .await
        .unwrap();
    let response = controller
        .handle_json(r#"{"action": "resume", "jobId": "j1"}"#)
        .await;
    assert_eq!(response.status, 200);

    let resumed = jobs.load_import(&job_id).await.unwrap().unwrap();
    assert_eq!(resumed.status, JobStatus::Complete);
    assert_eq!(resumed.processed_rows, 5);
    // The previous run's error entries were replaced by the fresh run.
    assert!(resumed.errors.is_empty());
}

#[tokio::test]
async fn test_missing_staged_file_leaves_job_untouched() {
    let jobs = Arc::new(MemoryJobStore::new());
    let artifacts = ArtifactStore::in_memory();
    jobs.save_import(&import_job("j1")).await.unwrap();

    let controller = controller_over(jobs.clone(), artifacts);
    let response = controller
        .handle_json(r#"{"action": "process", "jobId": "j1"}"#)
        .await;
    assert_eq!(response.status, 404);

    let job = jobs
        .load_import(&JobId::from_str("j1").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.status, JobStatus::Waiting);
}

#[tokio::test]
async fn test_separate_invocations_share_filesystem_state() {
    let state_dir = tempfile::tempdir().unwrap();
    let artifact_dir = tempfile::tempdir().unwrap();

    // First invocation: stage and process.
    {
        let jobs = Arc::new(FsJobStore::new(state_dir.path()));
        let artifacts =
            ArtifactStore::local(artifact_dir.path(), "http://localhost:8080/files").unwrap();
        stage(jobs.as_ref(), &artifacts, "j1", &workbook(7)).await;

        let controller = controller_over(jobs, artifacts);
        let response = controller
            .handle_json(r#"{"action": "process", "jobId": "j1"}"#)
            .await;
        assert_eq!(response.status, 200);
    }

    // Second invocation over the same directories observes the result.
    let jobs = FsJobStore::new(state_dir.path());
    let job = jobs
        .load_import(&JobId::from_str("j1").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.status, JobStatus::Complete);
    assert_eq!(job.processed_rows, 7);
}
