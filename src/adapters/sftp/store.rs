//! SFTP file store
//!
//! libssh2 is blocking, so the whole connect/login/write sequence runs on
//! Tokio's blocking pool.

use crate::adapters::storage::FileStore;
use crate::config::SftpConfig;
use crate::domain::{AppError, Result, UploadError};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use ssh2::Session;
use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

/// Password-authenticated SFTP destination
pub struct SftpStore {
    config: SftpConfig,
}

impl SftpStore {
    pub fn new(config: SftpConfig) -> Self {
        Self { config }
    }

    /// Remote path for `filename`, inside `remote_dir` when one is configured
    pub fn remote_path(&self, filename: &str) -> String {
        match self.config.remote_dir.as_deref() {
            None | Some("") => filename.to_string(),
            Some(dir) => format!("{}/{filename}", dir.trim_end_matches('/')),
        }
    }
}

/// Connect, log in and write the file in one blocking sequence
fn put_file(
    config: &SftpConfig,
    remote_path: &str,
    payload: &[u8],
) -> std::result::Result<(), UploadError> {
    let endpoint = format!("{}:{}", config.host, config.port);
    let timeout = Duration::from_secs(config.timeout_seconds);

    let addr = (config.host.as_str(), config.port)
        .to_socket_addrs()
        .map_err(|e| UploadError::Connection(format!("{endpoint}: {e}")))?
        .next()
        .ok_or_else(|| UploadError::Connection(format!("{endpoint}: no address resolved")))?;

    let tcp = TcpStream::connect_timeout(&addr, timeout)
        .map_err(|e| UploadError::Connection(format!("{endpoint}: {e}")))?;

    let mut session =
        Session::new().map_err(|e| UploadError::Connection(format!("{endpoint}: {e}")))?;
    session.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));
    session.set_tcp_stream(tcp);
    session
        .handshake()
        .map_err(|e| UploadError::Connection(format!("SSH handshake with {endpoint} failed: {e}")))?;

    session
        .userauth_password(&config.username, config.password.expose_secret().as_str())
        .map_err(|e| UploadError::Login(format!("{}@{endpoint}: {e}", config.username)))?;
    if !session.authenticated() {
        return Err(UploadError::Login(format!(
            "{}@{endpoint}: credentials were not accepted",
            config.username
        )));
    }

    let sftp = session
        .sftp()
        .map_err(|e| UploadError::Write(format!("could not open SFTP channel: {e}")))?;
    let mut file = sftp
        .create(Path::new(remote_path))
        .map_err(|e| UploadError::Write(format!("{remote_path}: {e}")))?;
    file.write_all(payload)
        .map_err(|e| UploadError::Write(format!("{remote_path}: {e}")))?;
    file.close()
        .map_err(|e| UploadError::Write(format!("{remote_path}: {e}")))?;

    Ok(())
}

#[async_trait]
impl FileStore for SftpStore {
    fn backend(&self) -> &'static str {
        "sftp"
    }

    fn destination(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    async fn store(&self, filename: &str, payload: &[u8]) -> Result<()> {
        let config = self.config.clone();
        let remote_path = self.remote_path(filename);
        let payload = payload.to_vec();

        tracing::debug!(
            host = %config.host,
            port = config.port,
            remote_path = %remote_path,
            bytes = payload.len(),
            "Writing file over SFTP"
        );

        let path_for_log = remote_path.clone();
        tokio::task::spawn_blocking(move || put_file(&config, &remote_path, &payload))
            .await
            .map_err(|e| AppError::Other(format!("SFTP upload task failed: {e}")))??;

        tracing::info!(remote_path = %path_for_log, "File written over SFTP");
        Ok(())
    }
}
