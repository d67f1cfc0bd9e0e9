//! Job report
//!
//! Outcome of one run, printed by the CLI and logged at completion.

use crate::domain::DateRange;
use std::fmt;
use std::time::Duration;

/// Stage at which a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Download,
    Authentication,
    Upload,
}

impl JobStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStage::Download => "download",
            JobStage::Authentication => "authentication",
            JobStage::Upload => "upload",
        }
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of one export run
#[derive(Debug, Clone)]
pub struct JobReport {
    /// Requested range
    pub range: DateRange,

    /// Computed target filename
    pub filename: String,

    /// Upload backend (`sftp`, `sharepoint`)
    pub backend: String,

    /// Where the file went, or would have gone
    pub destination: String,

    /// Size of the fetched export
    pub bytes: usize,

    /// Upload skipped on purpose
    pub dry_run: bool,

    /// Stopped by a shutdown signal before the upload
    pub interrupted: bool,

    /// Stage that failed, if any
    pub failed_stage: Option<JobStage>,

    /// Human-readable failure
    pub error: Option<String>,

    /// Wall-clock duration
    pub duration: Duration,
}

impl JobReport {
    pub fn new(range: DateRange, filename: String, backend: &str, destination: String) -> Self {
        Self {
            range,
            filename,
            backend: backend.to_string(),
            destination,
            bytes: 0,
            dry_run: false,
            interrupted: false,
            failed_stage: None,
            error: None,
            duration: Duration::ZERO,
        }
    }

    /// True when the fetch succeeded and the upload either succeeded or was
    /// skipped by dry-run
    pub fn is_successful(&self) -> bool {
        self.failed_stage.is_none() && !self.interrupted
    }

    pub fn record_failure(&mut self, stage: JobStage, error: impl Into<String>) {
        self.failed_stage = Some(stage);
        self.error = Some(error.into());
    }

    /// Process exit code: 0 success, 1 job failure, 130 interrupted
    pub fn exit_code(&self) -> i32 {
        if self.interrupted {
            130
        } else if self.is_successful() {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn report() -> JobReport {
        let range = DateRange::single(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        JobReport::new(
            range,
            "20240115.csv".to_string(),
            "sftp",
            "sftp.example.com:22".to_string(),
        )
    }

    #[test]
    fn test_new_report_is_successful() {
        let report = report();
        assert!(report.is_successful());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_failure() {
        let mut report = report();
        report.record_failure(JobStage::Authentication, "no token");
        assert!(!report.is_successful());
        assert_eq!(report.failed_stage, Some(JobStage::Authentication));
        assert_eq!(report.error.as_deref(), Some("no token"));
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_interrupted() {
        let mut report = report();
        report.interrupted = true;
        assert!(!report.is_successful());
        assert_eq!(report.exit_code(), 130);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(JobStage::Download.to_string(), "download");
        assert_eq!(JobStage::Authentication.to_string(), "authentication");
        assert_eq!(JobStage::Upload.to_string(), "upload");
    }
}
