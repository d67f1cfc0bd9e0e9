//! SharePoint document library file store

use super::auth::{snippet, AuthSession, SharePointAuthenticator};
use crate::adapters::storage::FileStore;
use crate::config::SharePointConfig;
use crate::domain::{AppError, Result, UploadError};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

/// Uploads into a document library through the REST `files/add` endpoint
///
/// Every [`FileStore::store`] call signs in afresh; sessions are not reused
/// between runs.
pub struct SharePointStore {
    client: Client,
    config: SharePointConfig,
}

impl SharePointStore {
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: SharePointConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .redirect(Policy::none())
            .build()
            .map_err(|e| {
                AppError::Configuration(format!("Failed to create SharePoint HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// Sign in and obtain the cookies and form digest for an upload
    pub async fn authenticate(&self) -> std::result::Result<AuthSession, crate::domain::AuthError> {
        SharePointAuthenticator::new(&self.client, &self.config)
            .authenticate()
            .await
    }

    /// `files/add` URL for `filename`, overwriting any existing file
    pub fn file_add_url(&self, filename: &str) -> std::result::Result<Url, UploadError> {
        let mut url = Url::parse(&self.config.site_url)
            .map_err(|e| UploadError::Request(format!("invalid site_url: {e}")))?;
        let list = format!("getbytitle('{}')", odata_quote(&self.config.list_name));
        let add = format!("add(url='{}',overwrite=true)", odata_quote(filename));

        url.path_segments_mut()
            .map_err(|()| UploadError::Request("site_url cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend([
                "_api",
                "web",
                "lists",
                list.as_str(),
                "rootfolder",
                "files",
                add.as_str(),
            ]);

        Ok(url)
    }

    /// POST the file bytes using an established session
    pub async fn upload(
        &self,
        session: &AuthSession,
        filename: &str,
        payload: &[u8],
    ) -> std::result::Result<(), UploadError> {
        let url = self.file_add_url(filename)?;

        tracing::debug!(
            list_name = %self.config.list_name,
            filename = %filename,
            bytes = payload.len(),
            "Posting file to SharePoint"
        );

        let response = self
            .client
            .post(url)
            .header(COOKIE, session.cookies.header_value())
            .header("X-RequestDigest", session.form_digest.expose_secret().as_str())
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(payload.to_vec())
            .send()
            .await
            .map_err(|e| UploadError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Request(format!(
                "HTTP {}: {}",
                status.as_u16(),
                snippet(&body)
            )));
        }

        Ok(())
    }
}

/// Escape a value for a single-quoted OData string literal
fn odata_quote(value: &str) -> String {
    value.replace('\'', "''")
}

#[async_trait]
impl FileStore for SharePointStore {
    fn backend(&self) -> &'static str {
        "sharepoint"
    }

    fn destination(&self) -> String {
        format!(
            "{} ({})",
            self.config.site_url.trim_end_matches('/'),
            self.config.list_name
        )
    }

    async fn store(&self, filename: &str, payload: &[u8]) -> Result<()> {
        let session = self.authenticate().await.map_err(|e| {
            tracing::error!(stage = e.stage(), error = %e, "SharePoint sign-in failed");
            AppError::from(e)
        })?;

        self.upload(&session, filename, payload).await?;

        tracing::info!(
            list_name = %self.config.list_name,
            filename = %filename,
            "File uploaded to SharePoint"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{secret_string, CookieSelection};

    fn store(site_url: &str, list_name: &str) -> SharePointStore {
        SharePointStore::new(SharePointConfig {
            username: "svc@contoso.com".to_string(),
            password: secret_string("pw".to_string()),
            tenant_url: "https://contoso.sharepoint.com".to_string(),
            site_url: site_url.to_string(),
            list_name: list_name.to_string(),
            security_token_url: "https://login.microsoftonline.com/extSTS.srf".to_string(),
            request_timeout_seconds: 60,
            cookie_selection: CookieSelection::Positional,
            cookie_names: vec!["rtFa".to_string(), "FedAuth".to_string()],
        })
        .unwrap()
    }

    #[test]
    fn test_file_add_url() {
        let store = store("https://contoso.sharepoint.com/sites/data", "Exports");
        let url = store.file_add_url("20240115.csv").unwrap();
        assert_eq!(
            url.as_str(),
            "https://contoso.sharepoint.com/sites/data/_api/web/lists/getbytitle('Exports')/rootfolder/files/add(url='20240115.csv',overwrite=true)"
        );
    }

    #[test]
    fn test_file_add_url_trailing_slash() {
        let store = store("https://contoso.sharepoint.com/sites/data/", "Exports");
        let url = store.file_add_url("a.csv").unwrap();
        assert!(url.path().starts_with("/sites/data/_api/web/"));
    }

    #[test]
    fn test_file_add_url_quotes_and_spaces() {
        let store = store("https://contoso.sharepoint.com/sites/data", "Bob's Exports");
        let url = store.file_add_url("o'neil.csv").unwrap();
        assert!(url.path().contains("getbytitle('Bob''s%20Exports')"));
        assert!(url.path().contains("add(url='o''neil.csv',overwrite=true)"));
    }

    #[test]
    fn test_file_add_url_encodes_reserved_characters() {
        let store = store("https://contoso.sharepoint.com/sites/data", "Exports");
        let url = store.file_add_url("a#b?.csv").unwrap();
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_destination() {
        let store = store("https://contoso.sharepoint.com/sites/data/", "Exports");
        assert_eq!(store.backend(), "sharepoint");
        assert_eq!(
            store.destination(),
            "https://contoso.sharepoint.com/sites/data (Exports)"
        );
    }
}
