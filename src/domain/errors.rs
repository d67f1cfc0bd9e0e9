//! Domain error types
//!
//! This module defines the error hierarchy for the export job. Each job stage
//! has its own error enum; [`AppError`] wraps them for propagation with `?`.
//! None of the variants expose third-party types.

use thiserror::Error;

/// Main application error type
///
/// This is the primary error type used throughout the crate.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Download stage errors
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// SharePoint handshake errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Upload stage errors
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operator notification errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while fetching the export from the data service
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The HTTP call itself failed (DNS, TLS, timeout, redirect loop...)
    #[error("Request to data service failed: {0}")]
    Transport(String),

    /// The service answered with something other than 200
    #[error("Data service returned status {status}")]
    UnexpectedStatus { status: u16 },

    /// The service answered 200 with an empty body
    #[error("Data service returned an empty body")]
    EmptyBody,

    /// The service answered 200 but the body carries one of its error markers.
    /// The body is kept so it can be inspected.
    #[error("The data contains an error message from the data service (matched '{marker}')")]
    Rejected { marker: String, payload: String },
}

impl DownloadError {
    /// Returns the rejected payload, if this error carries one
    pub fn payload(&self) -> Option<&str> {
        match self {
            DownloadError::Rejected { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

/// Errors raised by the SharePoint claims-based authentication handshake
///
/// Each variant names the stage that failed.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Requesting the WS-Trust security token failed
    #[error("Security token request failed: {0}")]
    SecurityToken(String),

    /// Exchanging the token for session cookies failed
    #[error("Auth cookie request failed: {0}")]
    AuthCookies(String),

    /// Requesting the form digest failed
    #[error("Form digest request failed: {0}")]
    FormDigest(String),
}

impl AuthError {
    /// Short stage name for structured logging
    pub fn stage(&self) -> &'static str {
        match self {
            AuthError::SecurityToken(_) => "security_token",
            AuthError::AuthCookies(_) => "auth_cookies",
            AuthError::FormDigest(_) => "form_digest",
        }
    }
}

/// Errors raised while writing the payload to the destination
#[derive(Debug, Error)]
pub enum UploadError {
    /// Could not reach the destination
    #[error("Could not connect to upload destination: {0}")]
    Connection(String),

    /// The destination rejected the credentials
    #[error("Could not log in to upload destination: {0}")]
    Login(String),

    /// The write call reported failure
    #[error("Could not write file to upload destination: {0}")]
    Write(String),

    /// The upload HTTP request failed or was rejected
    #[error("Upload request failed: {0}")]
    Request(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Configuration(format!("TOML parse error: {err}"))
    }
}
