//! Domain types for the export job.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Date range** ([`DateRange`]) and the target filename derived from it
//! - **Export payload** ([`ExportPayload`]) and error-marker classification
//! - **Error types** ([`AppError`], [`DownloadError`], [`AuthError`], [`UploadError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! Stage errors convert into [`AppError`] with `?`:
//!
//! ```rust
//! use dataexport::domain::{AppError, DownloadError, Result};
//!
//! fn fetch() -> std::result::Result<(), DownloadError> {
//!     Err(DownloadError::EmptyBody)
//! }
//!
//! fn run() -> Result<()> {
//!     fetch()?;
//!     Ok(())
//! }
//!
//! assert!(matches!(run(), Err(AppError::Download(_))));
//! ```

pub mod date_range;
pub mod errors;
pub mod payload;
pub mod result;

pub use date_range::DateRange;
pub use errors::{AppError, AuthError, DownloadError, UploadError};
pub use payload::{excerpt, find_error_marker, ExportPayload, DEFAULT_ERROR_MARKERS};
pub use result::Result;
