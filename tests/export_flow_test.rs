//! End-to-end export flow tests
//!
//! Drives exports through the action dispatcher one invocation per batch,
//! with a fresh controller per request where the cross-invocation model
//! matters, and asserts on the accumulated artifact and job record.

use std::str::FromStr;
use std::sync::Arc;
use tabula::adapters::artifacts::ArtifactStore;
use tabula::adapters::codec;
use tabula::adapters::jobs::{FsJobStore, JobStore, MemoryJobStore};
use tabula::adapters::tables::MemoryTableStore;
use tabula::core::chunk::ChunkPlanner;
use tabula::core::controller::JobController;
use tabula::domain::{CellValue, JobId, JobStatus};

fn controller_over(jobs: Arc<dyn JobStore>, artifacts: ArtifactStore) -> JobController {
    JobController::new(
        jobs,
        Arc::new(MemoryTableStore::new()),
        artifacts,
        ChunkPlanner::new(100),
    )
}

fn rows_json(start: u64, count: u64) -> String {
    let rows: Vec<String> = (start..start + count)
        .map(|i| format!(r#"{{"code": {i}, "name": "school-{i}"}}"#))
        .collect();
    rows.join(", ")
}

#[tokio::test]
async fn test_multi_batch_export_accumulates_across_invocations() {
    let state_dir = tempfile::tempdir().unwrap();
    let artifact_dir = tempfile::tempdir().unwrap();
    let base_url = "https://files.example.com";

    let send = |body: String| {
        let state = state_dir.path().to_path_buf();
        let artifacts = artifact_dir.path().to_path_buf();
        async move {
            // Fresh stores and controller per request: nothing survives an
            // invocation except what was persisted.
            let jobs = Arc::new(FsJobStore::new(state));
            let store = ArtifactStore::local(artifacts, base_url).unwrap();
            controller_over(jobs, store).handle_json(&body).await
        }
    };

    let first = send(format!(
        r#"{{
            "action": "export",
            "jobId": "e1",
            "fileName": "report.xlsx",
            "headers": ["code", "name"],
            "totalRows": 250,
            "dataBatch": [{}],
            "batchIndex": 0,
            "hasMoreBatches": true,
            "createdBy": "admin-7"
        }}"#,
        rows_json(0, 100)
    ))
    .await;
    assert_eq!(first.status, 200);
    let body = first.body_json();
    assert!(body.contains("\"isComplete\":false"));
    assert!(!body.contains("downloadUrl"));

    // The in-progress artifact exists between invocations.
    let store = ArtifactStore::local(artifact_dir.path(), base_url).unwrap();
    let temp = store
        .get("temp-exports/e1/temp_report.xlsx")
        .await
        .unwrap();
    assert_eq!(codec::decode(&temp).unwrap().row_count(), 100);

    let second = send(format!(
        r#"{{
            "action": "exportBatch",
            "jobId": "e1",
            "dataBatch": [{}],
            "batchIndex": 1,
            "hasMoreBatches": true
        }}"#,
        rows_json(100, 100)
    ))
    .await;
    assert_eq!(second.status, 200);

    let last = send(format!(
        r#"{{
            "action": "exportBatch",
            "jobId": "e1",
            "dataBatch": [{}],
            "batchIndex": 2,
            "hasMoreBatches": false
        }}"#,
        rows_json(200, 50)
    ))
    .await;
    assert_eq!(last.status, 200);
    let body = last.body_json();
    assert!(body.contains("\"isComplete\":true"));
    assert!(body.contains("https://files.example.com/exports/admin-7/report.xlsx"));

    // Final artifact holds every batch in order; the temp copy is gone.
    let final_bytes = store.get("exports/admin-7/report.xlsx").await.unwrap();
    let decoded = codec::decode(&final_bytes).unwrap();
    assert_eq!(decoded.row_count(), 250);
    assert_eq!(decoded.row(0).unwrap()[0], CellValue::Number(0.0));
    assert_eq!(decoded.row(100).unwrap()[0], CellValue::Number(100.0));
    assert_eq!(
        decoded.row(249).unwrap()[1],
        CellValue::Text("school-249".to_string())
    );
    assert!(store
        .get_opt("temp-exports/e1/temp_report.xlsx")
        .await
        .unwrap()
        .is_none());

    // Job record reflects completion.
    let jobs = FsJobStore::new(state_dir.path());
    let job = jobs
        .load_export(&JobId::from_str("e1").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.status, JobStatus::Complete);
    assert_eq!(job.progress, 100);
    assert_eq!(job.processed_rows, 250);
    assert_eq!(job.created_by, "admin-7");
}

#[tokio::test]
async fn test_progress_stays_partial_while_batches_remain() {
    let jobs = Arc::new(MemoryJobStore::new());
    let controller = controller_over(jobs.clone(), ArtifactStore::in_memory());

    let response = controller
        .handle_json(&format!(
            r#"{{
                "action": "export",
                "jobId": "e1",
                "fileName": "report.xlsx",
                "headers": ["code", "name"],
                "totalRows": 250,
                "dataBatch": [{}],
                "batchIndex": 0,
                "hasMoreBatches": true
            }}"#,
            rows_json(0, 100)
        ))
        .await;
    assert_eq!(response.status, 200);
    assert!(response.body_json().contains("\"progress\":40"));

    let job = jobs
        .load_export(&JobId::from_str("e1").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.status, JobStatus::Processing);
    assert!(job.progress < 100);
    assert!(job.download_url.is_none());
}

#[tokio::test]
async fn test_single_batch_export_completes_in_one_call() {
    let artifacts = ArtifactStore::in_memory();
    let controller = controller_over(Arc::new(MemoryJobStore::new()), artifacts.clone());

    let response = controller
        .handle_json(&format!(
            r#"{{
                "action": "export",
                "jobId": "e1",
                "fileName": "report.xlsx",
                "headers": ["code", "name"],
                "totalRows": 3,
                "dataBatch": [{}],
                "batchIndex": 0,
                "hasMoreBatches": false,
                "createdBy": "admin-7"
            }}"#,
            rows_json(0, 3)
        ))
        .await;

    assert_eq!(response.status, 200);
    assert!(response.body_json().contains("\"progress\":100"));
    assert!(artifacts
        .get_opt("exports/admin-7/report.xlsx")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_actor_defaults_to_system_when_absent() {
    let artifacts = ArtifactStore::in_memory();
    let controller = controller_over(Arc::new(MemoryJobStore::new()), artifacts.clone());

    let response = controller
        .handle_json(
            r#"{
                "action": "export",
                "jobId": "e1",
                "fileName": "report.xlsx",
                "headers": ["code"],
                "totalRows": 1,
                "dataBatch": [{"code": 1}],
                "batchIndex": 0,
                "hasMoreBatches": false
            }"#,
        )
        .await;

    assert_eq!(response.status, 200);
    assert!(artifacts
        .get_opt("exports/system/report.xlsx")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_first_batch_without_file_name_is_rejected() {
    let jobs = Arc::new(MemoryJobStore::new());
    let controller = controller_over(jobs.clone(), ArtifactStore::in_memory());

    let response = controller
        .handle_json(
            r#"{
                "action": "exportBatch",
                "jobId": "e1",
                "dataBatch": [{"code": 1}],
                "batchIndex": 0,
                "hasMoreBatches": true
            }"#,
        )
        .await;

    assert_eq!(response.status, 400);
    assert!(response.body_json().contains("fileName"));
    // No job record was created for the rejected request.
    assert!(jobs
        .load_export(&JobId::from_str("e1").unwrap())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_export_failure_marks_job_error() {
    let jobs = Arc::new(MemoryJobStore::new());
    let artifacts = ArtifactStore::in_memory();
    let controller = controller_over(jobs.clone(), artifacts.clone());

    // Plant an unreadable temp artifact so the splice step fails.
    artifacts
        .put(
            "temp-exports/e1/temp_report.xlsx",
            bytes::Bytes::from_static(b"corrupt"),
        )
        .await
        .unwrap();

    let response = controller
        .handle_json(
            r#"{
                "action": "export",
                "jobId": "e1",
                "fileName": "report.xlsx",
                "headers": ["code"],
                "totalRows": 1,
                "dataBatch": [{"code": 1}],
                "batchIndex": 0,
                "hasMoreBatches": false
            }"#,
        )
        .await;

    assert_eq!(response.status, 500);
    let job = jobs
        .load_export(&JobId::from_str("e1").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job.status, JobStatus::Error);
    assert_eq!(job.errors.len(), 1);
}
