//! Export job runner
//!
//! Runs fetch then upload strictly in sequence. Any stage failure is logged,
//! handed to the notifier and recorded in the [`JobReport`]; nothing after
//! the failing stage runs.

use super::report::{JobReport, JobStage};
use crate::adapters::dataservice::ExportFetcher;
use crate::adapters::storage::{create_file_store, FileStore};
use crate::config::AppConfig;
use crate::domain::{excerpt, AppError, DateRange, Result};
use crate::notify::{create_notifier, FailureMessages, NoticeKind, Notifier};
use crate::{log_job_complete, log_stage_failure};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Filename and run-mode settings for a job
#[derive(Debug, Clone)]
pub struct JobSettings {
    /// Appended to the formatted date range
    pub file_extension: String,
    /// strftime pattern for the filename dates
    pub date_format: String,
    /// Fetch and validate only
    pub dry_run: bool,
    /// Notice templates per failing stage
    pub messages: FailureMessages,
}

impl JobSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            file_extension: config.upload.file_extension.clone(),
            date_format: config.upload.date_format.clone(),
            dry_run: config.application.dry_run,
            messages: FailureMessages::from_config(&config.notification),
        }
    }
}

/// One export run: fetch, then upload
pub struct ExportJob {
    fetcher: ExportFetcher,
    store: Arc<dyn FileStore>,
    notifier: Arc<dyn Notifier>,
    settings: JobSettings,
    shutdown_signal: Option<watch::Receiver<bool>>,
}

impl ExportJob {
    pub fn new(
        fetcher: ExportFetcher,
        store: Arc<dyn FileStore>,
        notifier: Arc<dyn Notifier>,
        settings: JobSettings,
    ) -> Self {
        Self {
            fetcher,
            store,
            notifier,
            settings,
            shutdown_signal: None,
        }
    }

    /// Build every component from configuration
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if a client cannot be built or the
    /// section for the selected upload target is missing.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher = ExportFetcher::new(config.source.clone())?;
        let store = create_file_store(config)?;
        let notifier = create_notifier(&config.notification)?;
        Ok(Self::new(
            fetcher,
            store,
            notifier,
            JobSettings::from_config(config),
        ))
    }

    /// Stop before the upload once `true` is sent on this channel
    pub fn with_shutdown_signal(mut self, shutdown_signal: watch::Receiver<bool>) -> Self {
        self.shutdown_signal = Some(shutdown_signal);
        self
    }

    pub fn settings(&self) -> &JobSettings {
        &self.settings
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_signal
            .as_ref()
            .is_some_and(|signal| *signal.borrow())
    }

    /// Run the job for `range`
    pub async fn run(&self, range: DateRange) -> JobReport {
        let started = Instant::now();
        let filename = range.filename(&self.settings.date_format, &self.settings.file_extension);
        let mut report = JobReport::new(
            range,
            filename.clone(),
            self.store.backend(),
            self.store.destination(),
        );
        report.dry_run = self.settings.dry_run;

        tracing::info!(
            range = %range,
            filename = %filename,
            backend = self.store.backend(),
            dry_run = self.settings.dry_run,
            "Starting export job"
        );

        let payload = match self.fetcher.fetch(&range).await {
            Ok(payload) => payload,
            Err(e) => {
                self.fail(&mut report, JobStage::Download, AppError::from(e))
                    .await;
                return finish(report, started);
            }
        };
        report.bytes = payload.len();
        tracing::info!(bytes = payload.len(), "Export downloaded");

        if self.is_shutdown_requested() {
            tracing::warn!(filename = %filename, "Shutdown requested, upload not started");
            report.interrupted = true;
            return finish(report, started);
        }

        if self.settings.dry_run {
            tracing::info!(
                filename = %filename,
                destination = %report.destination,
                "Dry run: upload skipped"
            );
            return finish(report, started);
        }

        tracing::info!(
            destination = %report.destination,
            "Uploading {filename}"
        );

        match self.store.store(&filename, payload.as_bytes()).await {
            Ok(()) => {
                tracing::info!(range = %range, filename = %filename, "Export uploaded");
            }
            Err(e) => {
                let stage = match e {
                    AppError::Auth(_) => JobStage::Authentication,
                    _ => JobStage::Upload,
                };
                self.fail(&mut report, stage, e).await;
            }
        }

        finish(report, started)
    }

    async fn fail(&self, report: &mut JobReport, stage: JobStage, error: AppError) {
        log_stage_failure!(stage.as_str(), &error);

        let mut detail = error.to_string();
        if let Some(payload) = rejected_payload(&error) {
            detail.push_str(&format!("\nResponse: {}", excerpt(payload, 500)));
        }

        let kind = match stage {
            JobStage::Download => NoticeKind::Download,
            JobStage::Authentication | JobStage::Upload => NoticeKind::Upload,
        };
        let notice = self.settings.messages.notice(kind, &report.range, &detail);

        if let Err(e) = self.notifier.notify(&notice).await {
            tracing::warn!(
                channel = self.notifier.channel(),
                error = %e,
                "Failed to send failure notification"
            );
        }

        report.record_failure(stage, error.to_string());
    }
}

fn rejected_payload(error: &AppError) -> Option<&str> {
    match error {
        AppError::Download(download) => download.payload(),
        _ => None,
    }
}

fn finish(mut report: JobReport, started: Instant) -> JobReport {
    report.duration = started.elapsed();
    log_job_complete!(report.is_successful(), report.bytes, report.duration);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DownloadError, UploadError};

    #[test]
    fn test_rejected_payload_only_for_flagged_downloads() {
        let rejected = AppError::from(DownloadError::Rejected {
            marker: "ERROR:".to_string(),
            payload: "ERROR: no data".to_string(),
        });
        assert_eq!(rejected_payload(&rejected), Some("ERROR: no data"));

        let status = AppError::from(DownloadError::UnexpectedStatus { status: 500 });
        assert_eq!(rejected_payload(&status), None);

        let upload = AppError::from(UploadError::Write("disk full".to_string()));
        assert_eq!(rejected_payload(&upload), None);
    }
}
