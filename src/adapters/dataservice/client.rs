//! Data service export client
//!
//! One parameterized GET per run. The service reports business errors with a
//! 200 status and an error sentence in the body, so a successful transfer is
//! still checked against the configured error markers.

use crate::config::SourceConfig;
use crate::domain::{AppError, DateRange, DownloadError, ExportPayload, Result};
use reqwest::header::REFERER;
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Client for the data-export endpoint
///
/// # Example
///
/// ```no_run
/// use dataexport::adapters::dataservice::ExportFetcher;
/// use dataexport::config::load_config;
/// use dataexport::domain::DateRange;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("dataexport.toml")?;
/// let fetcher = ExportFetcher::new(config.source)?;
/// let range = DateRange::from_options_utc(None, None)?;
/// let payload = fetcher.fetch(&range).await?;
/// println!("{} bytes", payload.len());
/// # Ok(())
/// # }
/// ```
pub struct ExportFetcher {
    client: Client,
    config: SourceConfig,
}

impl ExportFetcher {
    /// Build the HTTP client from the source configuration
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: SourceConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .redirect(Policy::limited(config.max_redirects));

        if !config.tls_verify {
            tracing::warn!(
                base_url = %config.base_url,
                "TLS certificate verification is disabled for the data service"
            );
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            AppError::Configuration(format!("Failed to create HTTP client: {e}"))
        })?;

        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Download the export for `range`
    ///
    /// # Errors
    ///
    /// - [`DownloadError::Transport`] if the request fails
    /// - [`DownloadError::UnexpectedStatus`] for anything but 200; the body is not read
    /// - [`DownloadError::EmptyBody`] for an empty 200
    /// - [`DownloadError::Rejected`] if the body contains an error marker; the
    ///   body is carried in the error
    pub async fn fetch(&self, range: &DateRange) -> std::result::Result<ExportPayload, DownloadError> {
        let (start_date, end_date) = range.format_bounds(&self.config.date_format);

        tracing::info!(
            base_url = %self.config.base_url,
            start_date = %start_date,
            end_date = %end_date,
            format = %self.config.format,
            "Downloading export"
        );

        let response = self
            .client
            .get(&self.config.base_url)
            .header(REFERER, self.config.base_url.as_str())
            .query(&[
                ("token", self.config.token.expose_secret().as_str()),
                ("startDate", start_date.as_str()),
                ("endDate", end_date.as_str()),
                ("type", self.config.format.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DownloadError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| DownloadError::Transport(e.without_url().to_string()))?;

        if body.is_empty() {
            return Err(DownloadError::EmptyBody);
        }

        let payload = ExportPayload::new(body);
        if let Some(marker) = payload.find_error_marker(&self.config.error_markers) {
            return Err(DownloadError::Rejected {
                marker: marker.to_string(),
                payload: payload.into_string(),
            });
        }

        tracing::debug!(bytes = payload.len(), "Export downloaded");
        Ok(payload)
    }
}
