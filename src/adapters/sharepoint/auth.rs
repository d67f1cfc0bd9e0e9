//! Claims-based sign-in to SharePoint Online
//!
//! Three sequential requests, each consuming the previous output:
//!
//! 1. POST a WS-Trust envelope to the STS and read `BinarySecurityToken`
//! 2. POST that token to the tenant sign-in form and keep two session cookies
//! 3. POST to `_api/contextinfo` with those cookies and read `FormDigestValue`
//!
//! Any stage failing ends the handshake; later stages are never attempted.

use super::cookies::{select_session_cookies, SessionCookies};
use super::envelope::SecurityTokenRequest;
use super::xml::{element_text, DATASERVICES_NS, WSSE_NS};
use crate::config::{secret_string, SecretString, SharePointConfig};
use crate::domain::{excerpt, AuthError};
use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::{Client, Response};
use secrecy::ExposeSecret;

/// Credentials for one upload: two session cookies and a form digest
#[derive(Clone)]
pub struct AuthSession {
    pub cookies: SessionCookies,
    pub form_digest: SecretString,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("cookies", &self.cookies)
            .field("form_digest", &"[REDACTED]")
            .finish()
    }
}

/// Runs the sign-in handshake for one SharePoint site
pub struct SharePointAuthenticator<'a> {
    client: &'a Client,
    config: &'a SharePointConfig,
}

impl<'a> SharePointAuthenticator<'a> {
    /// `client` must not follow redirects, or the sign-in cookies are lost
    pub fn new(client: &'a Client, config: &'a SharePointConfig) -> Self {
        Self { client, config }
    }

    pub fn sign_in_url(&self) -> String {
        format!(
            "{}/_forms/default.aspx?wa=wsignin1.0",
            self.config.tenant_url.trim_end_matches('/')
        )
    }

    pub fn context_info_url(&self) -> String {
        format!("{}/_api/contextinfo", self.config.site_url.trim_end_matches('/'))
    }

    /// Run all three stages
    pub async fn authenticate(&self) -> Result<AuthSession, AuthError> {
        let token = self.request_security_token().await?;
        tracing::debug!("Security token received");

        let cookies = self.request_session_cookies(&token).await?;
        tracing::debug!(cookies = ?cookies, "Session cookies received");

        let form_digest = self.request_form_digest(&cookies).await?;
        tracing::info!(site_url = %self.config.site_url, "Authenticated to SharePoint");

        Ok(AuthSession {
            cookies,
            form_digest,
        })
    }

    async fn request_security_token(&self) -> Result<SecretString, AuthError> {
        let envelope = SecurityTokenRequest {
            to: &self.config.security_token_url,
            username: &self.config.username,
            password: self.config.password.expose_secret().as_str(),
            applies_to: &self.config.tenant_url,
        }
        .to_xml();

        tracing::debug!(
            url = %self.config.security_token_url,
            username = %self.config.username,
            "Requesting security token"
        );

        let response = self
            .client
            .post(&self.config.security_token_url)
            .header(CONTENT_TYPE, "application/soap+xml; charset=utf-8")
            .body(envelope)
            .send()
            .await
            .map_err(|e| AuthError::SecurityToken(e.to_string()))?;

        let body = success_body(response)
            .await
            .map_err(AuthError::SecurityToken)?;

        element_text(&body, WSSE_NS, "BinarySecurityToken")
            .map_err(|e| AuthError::SecurityToken(format!("unreadable response: {e}")))?
            .map(secret_string)
            .ok_or_else(|| {
                AuthError::SecurityToken(format!(
                    "no BinarySecurityToken in response: {}",
                    snippet(&body)
                ))
            })
    }

    async fn request_session_cookies(
        &self,
        token: &SecretString,
    ) -> Result<SessionCookies, AuthError> {
        let url = self.sign_in_url();
        tracing::debug!(url = %url, "Exchanging security token for session cookies");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(token.expose_secret().as_str().to_string())
            .send()
            .await
            .map_err(|e| AuthError::AuthCookies(e.to_string()))?;

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(AuthError::AuthCookies(format!(
                "sign-in returned HTTP {}",
                status.as_u16()
            )));
        }

        let raw_headers = raw_header_block(&response);
        select_session_cookies(
            &raw_headers,
            self.config.cookie_selection,
            &self.config.cookie_names,
        )
    }

    async fn request_form_digest(
        &self,
        cookies: &SessionCookies,
    ) -> Result<SecretString, AuthError> {
        let url = self.context_info_url();
        tracing::debug!(url = %url, "Requesting form digest");

        let response = self
            .client
            .post(&url)
            .header(COOKIE, cookies.header_value())
            .body("")
            .send()
            .await
            .map_err(|e| AuthError::FormDigest(e.to_string()))?;

        let body = success_body(response).await.map_err(AuthError::FormDigest)?;

        element_text(&body, DATASERVICES_NS, "FormDigestValue")
            .map_err(|e| AuthError::FormDigest(format!("unreadable response: {e}")))?
            .map(secret_string)
            .ok_or_else(|| {
                AuthError::FormDigest(format!(
                    "no FormDigestValue in response: {}",
                    snippet(&body)
                ))
            })
    }
}

/// Body of a 2xx response, or a message describing the failure
async fn success_body(response: Response) -> Result<String, String> {
    let status = response.status();
    let body = response.text().await.map_err(|e| e.to_string())?;
    if !status.is_success() {
        return Err(format!("HTTP {}: {}", status.as_u16(), snippet(&body)));
    }
    Ok(body)
}

/// Response status line and headers as one text block
fn raw_header_block(response: &Response) -> String {
    let mut raw = format!("{:?} {}\r\n", response.version(), response.status());
    for (name, value) in response.headers() {
        raw.push_str(name.as_str());
        raw.push_str(": ");
        raw.push_str(&String::from_utf8_lossy(value.as_bytes()));
        raw.push_str("\r\n");
    }
    raw
}

pub(crate) fn snippet(body: &str) -> String {
    excerpt(body, 200)
}
