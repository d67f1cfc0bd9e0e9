//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.

use crate::config::secret::{is_blank, SecretString};
use crate::domain::DEFAULT_ERROR_MARKERS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Browser-like user agent the data service expects
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.1; rv:33.0) Gecko/20100101 Firefox/33.0";

/// WS-Trust endpoint of the Microsoft identity provider
pub const DEFAULT_SECURITY_TOKEN_URL: &str = "https://login.microsoftonline.com/extSTS.srf";

/// Upload destination selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadTarget {
    /// SFTP server
    Sftp,
    /// SharePoint document library
    SharePoint,
}

impl fmt::Display for UploadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadTarget::Sftp => write!(f, "sftp"),
            UploadTarget::SharePoint => write!(f, "sharepoint"),
        }
    }
}

impl FromStr for UploadTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sftp" => Ok(UploadTarget::Sftp),
            "sharepoint" => Ok(UploadTarget::SharePoint),
            other => Err(format!(
                "Invalid upload target '{other}'. Must be one of: sftp, sharepoint"
            )),
        }
    }
}

/// How the two SharePoint session cookies are picked from `Set-Cookie` headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CookieSelection {
    /// Drop the cookie at index 2, keep the first two remaining
    #[default]
    Positional,
    /// Keep the cookies listed in `cookie_names`
    Named,
}

/// Transport security for the SMTP connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS
    #[default]
    StartTls,
    /// Implicit TLS (SMTPS)
    Tls,
    /// No encryption; local relays only
    None,
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Data service the export is downloaded from
    pub source: SourceConfig,

    /// Upload settings shared by every target
    pub upload: UploadConfig,

    /// SFTP destination (required if upload.target = "sftp")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sftp: Option<SftpConfig>,

    /// SharePoint destination (required if upload.target = "sharepoint")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharepoint: Option<SharePointConfig>,

    /// Operator email on failure
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validates the configuration
    ///
    /// Only the section for the active upload target is checked; the other
    /// one may be present and incomplete.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid field
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
        self.upload.validate()?;

        match self.upload.target {
            UploadTarget::Sftp => match self.sftp {
                Some(ref sftp) => sftp.validate()?,
                None => {
                    return Err(
                        "sftp configuration is required when upload.target = 'sftp'".to_string()
                    )
                }
            },
            UploadTarget::SharePoint => match self.sharepoint {
                Some(ref sharepoint) => sharepoint.validate()?,
                None => {
                    return Err(
                        "sharepoint configuration is required when upload.target = 'sharepoint'"
                            .to_string(),
                    )
                }
            },
        }

        self.notification.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Fetch and validate, but skip the upload
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Data service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Export endpoint; query parameters are appended
    pub base_url: String,

    /// API token sent as the `token` query parameter
    pub token: SecretString,

    /// Export format sent as the `type` query parameter
    #[serde(default = "default_format")]
    pub format: String,

    /// strftime pattern for `startDate`/`endDate`
    #[serde(default = "default_download_date_format")]
    pub date_format: String,

    /// Overall request timeout in seconds
    #[serde(default = "default_fetch_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// Maximum redirect hops to follow
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// TLS certificate verification
    ///
    /// Off by default: the data service has historically been reached with
    /// verification disabled. A warning is logged whenever it is off.
    #[serde(default)]
    pub tls_verify: bool,

    /// User agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Substrings that mark a 200 response as a service-side error
    #[serde(default = "default_error_markers")]
    pub error_markers: Vec<String>,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        validate_http_url("source.base_url", &self.base_url)?;

        if self.token.expose_secret().is_empty() {
            return Err("source.token cannot be empty".to_string());
        }

        if self.format.trim().is_empty() {
            return Err("source.format cannot be empty".to_string());
        }

        validate_date_format("source.date_format", &self.date_format)?;

        if self.timeout_seconds == 0 {
            return Err("source.timeout_seconds must be greater than 0".to_string());
        }

        if self.connect_timeout_seconds == 0 {
            return Err("source.connect_timeout_seconds must be greater than 0".to_string());
        }

        if self.max_redirects > 50 {
            return Err(format!(
                "source.max_redirects must be <= 50, got {}",
                self.max_redirects
            ));
        }

        Ok(())
    }
}

/// Upload settings shared by every target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Destination backend
    pub target: UploadTarget,

    /// Appended to the computed filename, e.g. ".csv"
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    /// strftime pattern for the dates in the filename
    #[serde(default = "default_upload_date_format")]
    pub date_format: String,
}

impl UploadConfig {
    fn validate(&self) -> Result<(), String> {
        validate_date_format("upload.date_format", &self.date_format)?;

        if self.file_extension.contains('/') || self.file_extension.contains('\\') {
            return Err(format!(
                "upload.file_extension cannot contain path separators, got '{}'",
                self.file_extension
            ));
        }

        Ok(())
    }
}

/// SFTP destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SftpConfig {
    /// Server host name or address
    pub host: String,

    /// Server port
    #[serde(default = "default_sftp_port")]
    pub port: u16,

    /// Login user
    pub username: String,

    /// Login password
    pub password: SecretString,

    /// Directory the file is written into (default: login directory)
    #[serde(default)]
    pub remote_dir: Option<String>,

    /// Session timeout in seconds
    #[serde(default = "default_sftp_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl SftpConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("sftp.host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("sftp.port must be greater than 0".to_string());
        }

        if self.username.is_empty() {
            return Err("sftp.username cannot be empty".to_string());
        }

        if is_blank(Some(&self.password)) {
            return Err("sftp.password cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("sftp.timeout_seconds must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// SharePoint document library destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharePointConfig {
    /// Account used for claims-based sign-in
    pub username: String,

    /// Account password
    pub password: SecretString,

    /// Tenant root, e.g. `https://contoso.sharepoint.com`; also the token realm
    pub tenant_url: String,

    /// Site holding the library, e.g. `https://contoso.sharepoint.com/sites/data`
    pub site_url: String,

    /// Title of the document library
    pub list_name: String,

    /// WS-Trust security token service
    #[serde(default = "default_security_token_url")]
    pub security_token_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Session cookie selection strategy
    #[serde(default)]
    pub cookie_selection: CookieSelection,

    /// Cookie names used when `cookie_selection = "named"`
    #[serde(default = "default_cookie_names")]
    pub cookie_names: Vec<String>,
}

impl SharePointConfig {
    fn validate(&self) -> Result<(), String> {
        if self.username.is_empty() {
            return Err("sharepoint.username cannot be empty".to_string());
        }

        if is_blank(Some(&self.password)) {
            return Err("sharepoint.password cannot be empty".to_string());
        }

        validate_http_url("sharepoint.tenant_url", &self.tenant_url)?;
        validate_http_url("sharepoint.site_url", &self.site_url)?;
        validate_http_url("sharepoint.security_token_url", &self.security_token_url)?;

        if self.list_name.trim().is_empty() {
            return Err("sharepoint.list_name cannot be empty".to_string());
        }

        if self.request_timeout_seconds == 0 {
            return Err("sharepoint.request_timeout_seconds must be greater than 0".to_string());
        }

        if self.cookie_selection == CookieSelection::Named && self.cookie_names.len() != 2 {
            return Err(format!(
                "sharepoint.cookie_names must list exactly 2 names when cookie_selection = 'named', got {}",
                self.cookie_names.len()
            ));
        }

        Ok(())
    }
}

/// Operator email configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Send email on failure; when off, failures are only logged
    #[serde(default)]
    pub enabled: bool,

    /// SMTP relay host
    #[serde(default)]
    pub smtp_host: String,

    /// SMTP relay port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Transport security
    #[serde(default)]
    pub smtp_security: SmtpSecurity,

    /// SMTP user (optional)
    #[serde(default)]
    pub smtp_username: Option<String>,

    /// SMTP password (optional)
    #[serde(default)]
    pub smtp_password: Option<SecretString>,

    /// Sender mailbox
    #[serde(default)]
    pub from: String,

    /// Recipient mailboxes
    #[serde(default)]
    pub to: Vec<String>,

    /// Subject for download failures
    #[serde(default = "default_download_subject")]
    pub download_subject: String,

    /// Body for download failures
    #[serde(default = "default_download_message")]
    pub download_message: String,

    /// Subject for authentication and upload failures
    #[serde(default = "default_upload_subject")]
    pub upload_subject: String,

    /// Body for authentication and upload failures
    #[serde(default = "default_upload_message")]
    pub upload_message: String,
}

impl NotificationConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }

        if self.smtp_host.trim().is_empty() {
            return Err("notification.smtp_host cannot be empty when enabled".to_string());
        }

        if self.smtp_port == 0 {
            return Err("notification.smtp_port must be greater than 0".to_string());
        }

        if self.smtp_username.is_some() && is_blank(self.smtp_password.as_ref()) {
            return Err(
                "notification.smtp_password is required when smtp_username is set".to_string(),
            );
        }

        self.from
            .parse::<lettre::message::Mailbox>()
            .map_err(|e| format!("notification.from '{}' is not a valid mailbox: {e}", self.from))?;

        if self.to.is_empty() {
            return Err("notification.to cannot be empty when enabled".to_string());
        }

        for address in &self.to {
            address
                .parse::<lettre::message::Mailbox>()
                .map_err(|e| format!("notification.to '{address}' is not a valid mailbox: {e}"))?;
        }

        Ok(())
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_security: SmtpSecurity::default(),
            smtp_username: None,
            smtp_password: None,
            from: String::new(),
            to: Vec::new(),
            download_subject: default_download_subject(),
            download_message: default_download_message(),
            upload_subject: default_upload_subject(),
            upload_message: default_upload_message(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON log lines to a local file
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Directory holding the log file
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log file name (rotated files get a date suffix)
    #[serde(default = "default_local_file")]
    pub local_file: String,

    /// Rotation: never, daily or hourly
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    /// Console output only, used before a configuration file is available
    pub fn console_only() -> Self {
        Self {
            local_enabled: false,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["never", "daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled {
            if self.local_path.is_empty() {
                return Err("logging.local_path cannot be empty when local_enabled".to_string());
            }
            if self.local_file.is_empty() {
                return Err("logging.local_file cannot be empty when local_enabled".to_string());
            }
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_file: default_local_file(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{field} cannot be empty"));
    }

    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(format!("{field} must start with http:// or https://"));
    }

    url::Url::parse(value).map_err(|e| format!("{field} is not a valid URL: {e}"))?;
    Ok(())
}

fn validate_date_format(field: &str, value: &str) -> Result<(), String> {
    use chrono::format::{Item, StrftimeItems};
    use std::fmt::Write;

    if value.is_empty() {
        return Err(format!("{field} cannot be empty"));
    }

    if StrftimeItems::new(value).any(|item| matches!(item, Item::Error)) {
        return Err(format!("{field} '{value}' is not a valid strftime pattern"));
    }

    // Patterns are applied to dates only; time or zone specifiers fail to format
    let sample = chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_default();
    let mut rendered = String::new();
    if write!(rendered, "{}", sample.format(value)).is_err() {
        return Err(format!(
            "{field} '{value}' must only use date specifiers (no time or time zone)"
        ));
    }

    Ok(())
}

// Default value functions

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "csv".to_string()
}

fn default_download_date_format() -> String {
    "%m%d%Y".to_string()
}

fn default_upload_date_format() -> String {
    "%Y%m%d".to_string()
}

fn default_fetch_timeout_seconds() -> u64 {
    60
}

fn default_connect_timeout_seconds() -> u64 {
    9
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_error_markers() -> Vec<String> {
    DEFAULT_ERROR_MARKERS.iter().map(|m| m.to_string()).collect()
}

fn default_file_extension() -> String {
    ".csv".to_string()
}

fn default_sftp_port() -> u16 {
    22
}

fn default_sftp_timeout_seconds() -> u64 {
    30
}

fn default_security_token_url() -> String {
    DEFAULT_SECURITY_TOKEN_URL.to_string()
}

fn default_request_timeout_seconds() -> u64 {
    60
}

fn default_cookie_names() -> Vec<String> {
    vec!["rtFa".to_string(), "FedAuth".to_string()]
}

fn default_smtp_port() -> u16 {
    587
}

fn default_download_subject() -> String {
    "Data export: download failed".to_string()
}

fn default_download_message() -> String {
    "The scheduled data export could not be downloaded.".to_string()
}

fn default_upload_subject() -> String {
    "Data export: upload failed".to_string()
}

fn default_upload_message() -> String {
    "The scheduled data export could not be uploaded.".to_string()
}

fn default_local_path() -> String {
    "/var/log/dataexport".to_string()
}

fn default_local_file() -> String {
    "dataexport.log".to_string()
}

fn default_local_rotation() -> String {
    "never".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret::secret_string;

    fn source() -> SourceConfig {
        SourceConfig {
            base_url: "https://data.example.com/export.service".to_string(),
            token: secret_string("token".to_string()),
            format: default_format(),
            date_format: default_download_date_format(),
            timeout_seconds: 60,
            connect_timeout_seconds: 9,
            max_redirects: 10,
            tls_verify: false,
            user_agent: default_user_agent(),
            error_markers: default_error_markers(),
        }
    }

    fn sharepoint() -> SharePointConfig {
        SharePointConfig {
            username: "svc@contoso.com".to_string(),
            password: secret_string("pw".to_string()),
            tenant_url: "https://contoso.sharepoint.com".to_string(),
            site_url: "https://contoso.sharepoint.com/sites/data".to_string(),
            list_name: "Exports".to_string(),
            security_token_url: default_security_token_url(),
            request_timeout_seconds: 60,
            cookie_selection: CookieSelection::Positional,
            cookie_names: default_cookie_names(),
        }
    }

    fn sftp() -> SftpConfig {
        SftpConfig {
            host: "sftp.example.com".to_string(),
            port: 22,
            username: "uploader".to_string(),
            password: secret_string("pw".to_string()),
            remote_dir: None,
            timeout_seconds: 30,
        }
    }

    fn config(target: UploadTarget) -> AppConfig {
        AppConfig {
            application: ApplicationConfig::default(),
            source: source(),
            upload: UploadConfig {
                target,
                file_extension: ".csv".to_string(),
                date_format: default_upload_date_format(),
            },
            sftp: None,
            sharepoint: None,
            notification: NotificationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_source_config_validation() {
        let mut config = source();
        assert!(config.validate().is_ok());

        config.base_url = "ftp://data.example.com".to_string();
        assert!(config.validate().is_err());

        config = source();
        config.token = secret_string(String::new());
        assert!(config.validate().is_err());

        config = source();
        config.date_format = "%Q".to_string();
        assert!(config.validate().is_err());

        config = source();
        config.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_date_format_rejects_time_specifiers() {
        for pattern in ["%Y%m%d%H", "%Y-%m-%d_%M", "%S", "%Y%m%d%z"] {
            let mut config = config(UploadTarget::Sftp);
            config.upload.date_format = pattern.to_string();
            let err = config.upload.validate().unwrap_err();
            assert!(err.contains("upload.date_format"), "{pattern}: {err}");

            let mut source = source();
            source.date_format = pattern.to_string();
            assert!(source.validate().is_err(), "{pattern}");
        }

        let mut config = config(UploadTarget::Sftp);
        config.upload.date_format = "%Y-%m-%d_%a".to_string();
        assert!(config.upload.validate().is_ok());
    }

    #[test]
    fn test_active_target_section_required() {
        let mut config = config(UploadTarget::Sftp);
        let err = config.validate().unwrap_err();
        assert!(err.contains("sftp configuration is required"));

        config.sftp = Some(sftp());
        assert!(config.validate().is_ok());

        config.upload.target = UploadTarget::SharePoint;
        let err = config.validate().unwrap_err();
        assert!(err.contains("sharepoint configuration is required"));

        config.sharepoint = Some(sharepoint());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inactive_target_section_not_validated() {
        let mut config = config(UploadTarget::SharePoint);
        config.sharepoint = Some(sharepoint());
        let mut broken = sftp();
        broken.host = String::new();
        config.sftp = Some(broken);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sharepoint_named_cookies_need_two_names() {
        let mut config = sharepoint();
        config.cookie_selection = CookieSelection::Named;
        assert!(config.validate().is_ok());

        config.cookie_names = vec!["FedAuth".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_notification_validation() {
        let mut config = NotificationConfig::default();
        assert!(config.validate().is_ok());

        config.enabled = true;
        assert!(config.validate().is_err());

        config.smtp_host = "smtp.example.com".to_string();
        config.from = "Export Job <export@example.com>".to_string();
        config.to = vec!["ops@example.com".to_string()];
        assert!(config.validate().is_ok());

        config.to = vec!["not an address".to_string()];
        assert!(config.validate().is_err());

        config.to = vec!["ops@example.com".to_string()];
        config.smtp_username = Some("mailer".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());

        let console = LoggingConfig::console_only();
        assert!(!console.local_enabled);
    }

    #[test]
    fn test_upload_target_from_str() {
        assert_eq!("sftp".parse::<UploadTarget>(), Ok(UploadTarget::Sftp));
        assert_eq!(" SharePoint ".parse::<UploadTarget>(), Ok(UploadTarget::SharePoint));
        assert!("s3".parse::<UploadTarget>().is_err());
        assert_eq!(UploadTarget::SharePoint.to_string(), "sharepoint");
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_download_date_format(), "%m%d%Y");
        assert_eq!(default_upload_date_format(), "%Y%m%d");
        assert_eq!(default_connect_timeout_seconds(), 9);
        assert_eq!(default_max_redirects(), 10);
        assert_eq!(default_error_markers(), vec!["ERROR:", "Data can only be exported"]);
        assert_eq!(default_cookie_names(), vec!["rtFa", "FedAuth"]);
        assert_eq!(default_security_token_url(), DEFAULT_SECURITY_TOKEN_URL);
    }
}
