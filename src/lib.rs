// dataexport - Data service export to SFTP or SharePoint
// Copyright (c) 2025 dataexport Contributors
// Licensed under the MIT License

//! # dataexport - scheduled data-service export
//!
//! dataexport downloads a date-ranged export from an HTTP data service and
//! delivers it as a single file to an SFTP server or a SharePoint Online
//! document library. It is meant to run once per invocation from a scheduler.
//!
//! ## Overview
//!
//! - **Fetch** the export with a token-authenticated GET and reject bodies
//!   that carry the service's error markers
//! - **Name** the file after the date range: `20240115.csv` or
//!   `20240101-20240131.csv`
//! - **Upload** over SFTP, or to SharePoint after the claims-based sign-in
//!   (STS token, session cookies, form digest)
//! - **Notify** the operator by email when any stage fails
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Job orchestration and reporting
//! - [`adapters`] - Data service, SFTP and SharePoint integrations
//! - [`notify`] - Failure notifications
//! - [`domain`] - Date range, payload and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dataexport::config::load_config;
//! use dataexport::core::job::ExportJob;
//! use dataexport::domain::DateRange;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("dataexport.toml")?;
//!     let job = ExportJob::from_config(&config)?;
//!
//!     // Yesterday, in UTC
//!     let report = job.run(DateRange::from_options_utc(None, None)?).await;
//!
//!     println!("{}", if report.is_successful() { "Success!" } else { "Fail!" });
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Stage errors ([`domain::DownloadError`], [`domain::AuthError`],
//! [`domain::UploadError`]) convert into [`domain::AppError`] with `?`:
//!
//! ```rust,no_run
//! use dataexport::domain::AppError;
//!
//! fn example() -> Result<(), AppError> {
//!     let _config = dataexport::config::load_config("dataexport.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! dataexport uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! tracing::info!(filename = "20240115.csv", "Uploading");
//! tracing::error!(stage = "download", "Job stage failed");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod notify;
