//! External system integrations for Tabula.
//!
//! This module provides adapters for the processor's external collaborators:
//!
//! - [`artifacts`] - Blob storage for staged, in-progress and finalized artifacts
//! - [`codec`] - Spreadsheet decoding and encoding
//! - [`jobs`] - Job record persistence (in-memory and filesystem)
//! - [`tables`] - Destination table writes (insert and upsert)

pub mod artifacts;
pub mod codec;
pub mod jobs;
pub mod tables;
