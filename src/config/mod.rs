//! Configuration management.
//!
//! Every URL, credential, date format and file-naming parameter the job
//! needs lives in one [`AppConfig`] that is handed to each component at
//! construction. Nothing reads the environment after loading.
//!
//! # Overview
//!
//! Configuration comes from a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `DATAEXPORT_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation of the active upload target only
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [source]
//! base_url = "https://data.example.com/ea-dataservice/export.service"
//! token = "${DATAEXPORT_TOKEN}"
//! format = "csv"
//!
//! [upload]
//! target = "sharepoint"
//! file_extension = ".csv"
//!
//! [sharepoint]
//! username = "svc-export@contoso.onmicrosoft.com"
//! password = "${SHAREPOINT_PASSWORD}"
//! tenant_url = "https://contoso.sharepoint.com"
//! site_url = "https://contoso.sharepoint.com/sites/reporting"
//! list_name = "Exports"
//! ```
//!
//! # Sections
//!
//! - [`ApplicationConfig`] - log level, dry run
//! - [`SourceConfig`] - data service endpoint, token, timeouts, error markers
//! - [`UploadConfig`] - target selection and filename format
//! - [`SftpConfig`] / [`SharePointConfig`] - destination settings
//! - [`NotificationConfig`] - operator email
//! - [`LoggingConfig`] - log file settings

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    AppConfig, ApplicationConfig, CookieSelection, LoggingConfig, NotificationConfig,
    SftpConfig, SharePointConfig, SmtpSecurity, SourceConfig, UploadConfig, UploadTarget,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
