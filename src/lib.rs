// Tabula - Spreadsheet Import/Export Job Processor
// Copyright (c) 2025 Tabula Contributors
// Licensed under the MIT License

//! # Tabula - Spreadsheet Import/Export Job Processor
//!
//! Tabula turns bulk spreadsheet imports and exports into resumable,
//! progress-reporting background jobs. Imports consume a staged XLSX file in
//! fixed-size chunks and write each chunk to a destination table; exports
//! accumulate caller-supplied row batches into an XLSX artifact across many
//! short invocations.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Importing** staged spreadsheets chunk by chunk with durable,
//!   per-chunk progress and row-attributed error accumulation
//! - **Exporting** row batches into a spliced XLSX artifact, finalized with
//!   a stable download link once the last batch arrives
//! - **Dispatching** a JSON action protocol (`process`, `resume`, `cancel`,
//!   `export`, `exportBatch`) to the right processor
//!
//! ## Architecture
//!
//! Tabula follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (chunking, import, export, dispatch)
//! - [`adapters`] - External integrations (artifacts, codec, jobs, tables)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tabula::adapters::artifacts::ArtifactStore;
//! use tabula::adapters::jobs::MemoryJobStore;
//! use tabula::adapters::tables::MemoryTableStore;
//! use tabula::core::chunk::ChunkPlanner;
//! use tabula::core::controller::JobController;
//!
//! # async fn example() {
//! let controller = JobController::new(
//!     Arc::new(MemoryJobStore::new()),
//!     Arc::new(MemoryTableStore::new()),
//!     ArtifactStore::in_memory(),
//!     ChunkPlanner::default(),
//! );
//!
//! let response = controller
//!     .handle_json(r#"{"action": "process", "jobId": "job-1"}"#)
//!     .await;
//! println!("{} {}", response.status, response.body_json());
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Tabula uses the [`domain::errors::TabulaError`] type for all errors;
//! every error maps to an HTTP-class status code so the dispatcher can
//! render any failure as a response:
//!
//! ```rust
//! use tabula::domain::errors::TabulaError;
//!
//! let err = TabulaError::NotFound("import job j1".to_string());
//! assert_eq!(err.status_code(), 404);
//! ```
//!
//! ## Logging
//!
//! Tabula uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(job_id = "j1", chunk = 3, progress = 40, "Chunk persisted");
//! warn!(job_id = "j1", "Batch write failed, continuing with next chunk");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
