//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{AppConfig, UploadTarget};
use super::secret::secret_string;
use crate::domain::errors::AppError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`AppConfig`]
/// 4. Applies environment variable overrides (`DATAEXPORT_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`AppError::Configuration`] if the file is missing or unreadable,
/// a referenced variable is unset, parsing fails, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use dataexport::config::load_config;
///
/// let config = load_config("dataexport.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AppError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AppError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Same as [`load_config`] for configuration text already in memory
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: AppConfig = toml::from_str(&contents)
        .map_err(|e| AppError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config
        .validate()
        .map_err(|e| AppError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are copied untouched. Every unset variable is reported in
/// one error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| AppError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(AppError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    let mut result = lines.join("\n");
    if input.ends_with('\n') {
        result.push('\n');
    }
    Ok(result)
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn env_bool(name: &str) -> Result<Option<bool>> {
    env(name)
        .map(|val| {
            val.parse::<bool>().map_err(|_| {
                AppError::Configuration(format!("{name} must be 'true' or 'false', got '{val}'"))
            })
        })
        .transpose()
}

fn env_number<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    env(name)
        .map(|val| {
            val.parse::<T>().map_err(|_| {
                AppError::Configuration(format!("{name} must be a number, got '{val}'"))
            })
        })
        .transpose()
}

/// Applies environment variable overrides using the `DATAEXPORT_` prefix
///
/// Variables follow the pattern `DATAEXPORT_<SECTION>_<KEY>`, for example
/// `DATAEXPORT_SOURCE_TOKEN` or `DATAEXPORT_UPLOAD_TARGET`. Target sections
/// are only overridden when present in the file.
fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
    // Application
    if let Some(val) = env("DATAEXPORT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env_bool("DATAEXPORT_APPLICATION_DRY_RUN")? {
        config.application.dry_run = val;
    }

    // Source
    if let Some(val) = env("DATAEXPORT_SOURCE_BASE_URL") {
        config.source.base_url = val;
    }
    if let Some(val) = env("DATAEXPORT_SOURCE_TOKEN") {
        config.source.token = secret_string(val);
    }
    if let Some(val) = env("DATAEXPORT_SOURCE_FORMAT") {
        config.source.format = val;
    }
    if let Some(val) = env_number("DATAEXPORT_SOURCE_TIMEOUT_SECONDS")? {
        config.source.timeout_seconds = val;
    }
    if let Some(val) = env_bool("DATAEXPORT_SOURCE_TLS_VERIFY")? {
        config.source.tls_verify = val;
    }

    // Upload
    if let Some(val) = env("DATAEXPORT_UPLOAD_TARGET") {
        config.upload.target = val.parse::<UploadTarget>().map_err(AppError::Configuration)?;
    }
    if let Some(val) = env("DATAEXPORT_UPLOAD_FILE_EXTENSION") {
        config.upload.file_extension = val;
    }

    // SFTP
    if let Some(ref mut sftp) = config.sftp {
        if let Some(val) = env("DATAEXPORT_SFTP_HOST") {
            sftp.host = val;
        }
        if let Some(val) = env_number("DATAEXPORT_SFTP_PORT")? {
            sftp.port = val;
        }
        if let Some(val) = env("DATAEXPORT_SFTP_USERNAME") {
            sftp.username = val;
        }
        if let Some(val) = env("DATAEXPORT_SFTP_PASSWORD") {
            sftp.password = secret_string(val);
        }
        if let Some(val) = env("DATAEXPORT_SFTP_REMOTE_DIR") {
            sftp.remote_dir = Some(val);
        }
    }

    // SharePoint
    if let Some(ref mut sharepoint) = config.sharepoint {
        if let Some(val) = env("DATAEXPORT_SHAREPOINT_USERNAME") {
            sharepoint.username = val;
        }
        if let Some(val) = env("DATAEXPORT_SHAREPOINT_PASSWORD") {
            sharepoint.password = secret_string(val);
        }
        if let Some(val) = env("DATAEXPORT_SHAREPOINT_SITE_URL") {
            sharepoint.site_url = val;
        }
        if let Some(val) = env("DATAEXPORT_SHAREPOINT_LIST_NAME") {
            sharepoint.list_name = val;
        }
    }

    // Notification
    if let Some(val) = env_bool("DATAEXPORT_NOTIFICATION_ENABLED")? {
        config.notification.enabled = val;
    }
    if let Some(val) = env("DATAEXPORT_NOTIFICATION_SMTP_HOST") {
        config.notification.smtp_host = val;
    }
    if let Some(val) = env("DATAEXPORT_NOTIFICATION_SMTP_PASSWORD") {
        config.notification.smtp_password = Some(secret_string(val));
    }
    if let Some(val) = env("DATAEXPORT_NOTIFICATION_TO") {
        config.notification.to = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    // Logging
    if let Some(val) = env_bool("DATAEXPORT_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env("DATAEXPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env("DATAEXPORT_LOGGING_LOCAL_FILE") {
        config.logging.local_file = val;
    }

    Ok(())
}
