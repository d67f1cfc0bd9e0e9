//! File store factory
//!
//! Builds the upload backend selected by `upload.target`.

use crate::adapters::sftp::SftpStore;
use crate::adapters::sharepoint::SharePointStore;
use crate::adapters::storage::traits::FileStore;
use crate::config::{AppConfig, UploadTarget};
use crate::domain::{AppError, Result};
use std::sync::Arc;

/// Create the file store for the configured upload target
///
/// # Errors
///
/// Returns [`AppError::Configuration`] if the section for the selected target
/// is missing or the backend cannot be constructed.
pub fn create_file_store(config: &AppConfig) -> Result<Arc<dyn FileStore>> {
    match config.upload.target {
        UploadTarget::Sftp => {
            let sftp_config = config.sftp.as_ref().ok_or_else(|| {
                AppError::Configuration(
                    "sftp configuration is required when upload.target = 'sftp'".to_string(),
                )
            })?;

            tracing::info!(host = %sftp_config.host, "Creating SFTP file store");
            Ok(Arc::new(SftpStore::new(sftp_config.clone())) as Arc<dyn FileStore>)
        }
        UploadTarget::SharePoint => {
            let sharepoint_config = config.sharepoint.as_ref().ok_or_else(|| {
                AppError::Configuration(
                    "sharepoint configuration is required when upload.target = 'sharepoint'"
                        .to_string(),
                )
            })?;

            tracing::info!(site_url = %sharepoint_config.site_url, "Creating SharePoint file store");
            let store = SharePointStore::new(sharepoint_config.clone())?;
            Ok(Arc::new(store) as Arc<dyn FileStore>)
        }
    }
}
