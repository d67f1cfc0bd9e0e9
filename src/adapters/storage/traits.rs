//! Upload destination abstraction
//!
//! SFTP and SharePoint are two implementations of the same capability:
//! persist the payload bytes under a computed filename in a remote store.

use crate::domain::Result;
use async_trait::async_trait;

/// Remote store the export is delivered to
///
/// Implementations perform any authentication they need inside
/// [`FileStore::store`]; a failure there must leave the destination
/// untouched.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Short backend name used in logs ("sftp", "sharepoint")
    fn backend(&self) -> &'static str;

    /// Where the file goes, for logs and the run summary
    fn destination(&self) -> String;

    /// Write `payload` as `filename`, replacing any existing file
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::AppError::Auth`] if authentication fails and
    /// [`crate::domain::AppError::Upload`] if the write fails.
    async fn store(&self, filename: &str, payload: &[u8]) -> Result<()>;
}
