//! Domain models and types for Tabula.
//!
//! This module contains the core domain models, types and business rules for
//! the import/export job processor.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`JobId`], [`TableName`])
//! - **Job records** ([`ImportJob`], [`ExportJob`], [`JobStatus`])
//! - **Row and cell models** ([`RowRecord`], [`CellValue`], [`Workbook`])
//! - **Error types** ([`TabulaError`], [`ArtifactError`], [`CodecError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Tabula uses the newtype pattern for identifiers to prevent mixing
//! different ID kinds:
//!
//! ```rust
//! use tabula::domain::{JobId, TableName};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let job_id = JobId::new("job-123")?;
//! let table = TableName::new("schools")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, TabulaError>`]:
//!
//! ```rust
//! use tabula::domain::{Result, TabulaError};
//!
//! fn example() -> Result<()> {
//!     Err(TabulaError::Protocol("Unknown action".to_string()))
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod job;
pub mod result;
pub mod row;
pub mod workbook;

// Re-export commonly used types for convenience
pub use errors::{ArtifactError, CodecError, TabulaError};
pub use ids::{JobId, TableName};
pub use job::{ExportJob, ImportJob, JobMessage, JobStatus, RowError};
pub use result::Result;
pub use row::{CellValue, RowRecord};
pub use workbook::Workbook;
