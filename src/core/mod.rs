//! Core job logic.
//!
//! # Job Workflow
//!
//! 1. **Fetch**: download the export for the requested date range
//! 2. **Classify**: reject bodies carrying a data-service error marker
//! 3. **Authenticate** (SharePoint only): STS token, session cookies, form digest
//! 4. **Upload**: write `<from>[-<to>]<extension>` to the destination
//! 5. **Report**: log, notify on failure, and return a [`job::JobReport`]
//!
//! # Example
//!
//! ```rust,no_run
//! use dataexport::config::load_config;
//! use dataexport::core::job::ExportJob;
//! use dataexport::domain::DateRange;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("dataexport.toml")?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let job = ExportJob::from_config(&config)?.with_shutdown_signal(shutdown_rx);
//! let report = job.run(DateRange::from_options_utc(None, None)?).await;
//!
//! println!("{} -> {}", report.filename, report.destination);
//! # Ok(())
//! # }
//! ```

pub mod job;
