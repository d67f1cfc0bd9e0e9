//! Logging and observability
//!
//! Structured logging with `tracing`:
//! - console output for operators and schedulers
//! - optional JSON log file with `never`, `daily` or `hourly` rotation
//! - `RUST_LOG` overrides the configured level
//!
//! # Example
//!
//! ```no_run
//! use dataexport::logging::init_logging;
//! use dataexport::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! tracing::error!(stage = "download", error = "HTTP 500", "Stage failed");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a failed job stage
///
/// # Example
///
/// ```no_run
/// use dataexport::log_stage_failure;
/// use dataexport::domain::AppError;
///
/// let error = AppError::Other("connection reset".to_string());
/// log_stage_failure!("upload", &error);
/// ```
#[macro_export]
macro_rules! log_stage_failure {
    ($stage:expr, $error:expr) => {
        tracing::error!(
            stage = $stage,
            error = %$error,
            "Job stage failed"
        );
    };
}

/// Log the end of a job run
///
/// # Example
///
/// ```no_run
/// use dataexport::log_job_complete;
/// use std::time::Duration;
///
/// log_job_complete!(true, 1024, Duration::from_millis(350));
/// ```
#[macro_export]
macro_rules! log_job_complete {
    ($success:expr, $bytes:expr, $duration:expr) => {
        tracing::info!(
            success = $success,
            bytes = $bytes,
            duration_ms = $duration.as_millis() as u64,
            "Export job finished"
        );
    };
}
