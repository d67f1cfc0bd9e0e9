//! Result type alias
//!
//! Convenience alias that uses [`AppError`] as the error type.

use super::errors::AppError;

/// Result type alias for fallible operations in this crate
///
/// # Examples
///
/// ```
/// use dataexport::domain::result::Result;
/// use dataexport::domain::errors::AppError;
///
/// fn failing_function() -> Result<()> {
///     Err(AppError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, AppError>;
