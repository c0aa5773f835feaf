//! Result type alias for Tabula
//!
//! This module provides a convenient Result type alias that uses TabulaError
//! as the error type.

use super::errors::TabulaError;

/// Result type alias for Tabula operations
///
/// This is a convenience type alias that uses `TabulaError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use tabula::domain::result::Result;
/// use tabula::domain::errors::TabulaError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(TabulaError::Protocol("Unknown action".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, TabulaError>;
