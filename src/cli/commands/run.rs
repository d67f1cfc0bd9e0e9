//! Run command implementation
//!
//! Loads configuration, applies command-line overrides, runs the export job
//! once and maps its outcome to an exit code.

use crate::config::{load_config, UploadTarget};
use crate::core::job::{ExportJob, JobReport};
use crate::domain::DateRange;
use chrono::NaiveDate;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// First day to export, YYYY-MM-DD (default: yesterday)
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Last day to export, YYYY-MM-DD (default: yesterday)
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Override the upload target (sftp or sharepoint)
    #[arg(long, value_parser = parse_target)]
    pub target: Option<UploadTarget>,

    /// Fetch and validate the export without uploading it
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_target(value: &str) -> Result<UploadTarget, String> {
    value.parse()
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting run command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                println!("Fail!");
                return Ok(2);
            }
        };

        if let Some(target) = self.target {
            tracing::info!(target = %target, "Overriding upload target from CLI");
            config.upload.target = target;
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            println!("Fail!");
            return Ok(2);
        }

        let range = match DateRange::from_options_utc(self.from, self.to) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Invalid date range");
                eprintln!("{e}");
                println!("Fail!");
                return Ok(2);
            }
        };

        let job = match ExportJob::from_config(&config) {
            Ok(job) => job.with_shutdown_signal(shutdown_signal),
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize export job");
                eprintln!("Failed to initialize export job: {e}");
                println!("Fail!");
                return Ok(2);
            }
        };

        if config.application.dry_run {
            println!("DRY RUN - the export will be fetched but not uploaded");
            println!();
        }

        let report = job.run(range).await;
        print_report(&report);

        Ok(report.exit_code())
    }
}

fn print_report(report: &JobReport) {
    println!("Export Summary:");
    println!("  Date range: {}", report.range);
    println!("  File: {}", report.filename);
    println!("  Target: {} ({})", report.backend, report.destination);
    println!("  Bytes: {}", report.bytes);
    println!("  Duration: {:.2}s", report.duration.as_secs_f64());
    if let (Some(stage), Some(error)) = (report.failed_stage, &report.error) {
        println!("  Failed stage: {stage}");
        println!("  Error: {error}");
    }
    println!();

    if report.interrupted {
        println!("Interrupted before upload.");
    } else if report.is_successful() {
        if report.dry_run {
            println!("Dry run complete for {}.", report.range);
        } else {
            println!("Export for {} uploaded as {}.", report.range, report.filename);
        }
    }

    println!("{}", if report.is_successful() { "Success!" } else { "Fail!" });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("sftp"), Ok(UploadTarget::Sftp));
        assert_eq!(parse_target("SharePoint"), Ok(UploadTarget::SharePoint));
        assert!(parse_target("s3").is_err());
    }

    #[tokio::test]
    async fn test_missing_config_is_config_error() {
        let args = RunArgs {
            from: None,
            to: None,
            target: None,
            dry_run: false,
        };
        let (_tx, rx) = watch::channel(false);
        let code = args.execute("/nonexistent/dataexport.toml", rx).await.unwrap();
        assert_eq!(code, 2);
    }
}
