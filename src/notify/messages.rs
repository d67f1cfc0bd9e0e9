//! Subject and body templates for failure notices

use super::traits::Notice;
use crate::config::NotificationConfig;
use crate::domain::DateRange;

/// Which configured template a failure uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The export could not be fetched or was rejected
    Download,
    /// Sign-in or the file write failed
    Upload,
}

/// Configured subjects and messages for failure notices
#[derive(Debug, Clone)]
pub struct FailureMessages {
    pub download_subject: String,
    pub download_message: String,
    pub upload_subject: String,
    pub upload_message: String,
}

impl FailureMessages {
    pub fn from_config(config: &NotificationConfig) -> Self {
        Self {
            download_subject: config.download_subject.clone(),
            download_message: config.download_message.clone(),
            upload_subject: config.upload_subject.clone(),
            upload_message: config.upload_message.clone(),
        }
    }

    /// Compose the notice: configured message, then the date range and detail
    pub fn notice(&self, kind: NoticeKind, range: &DateRange, detail: &str) -> Notice {
        let (subject, message) = match kind {
            NoticeKind::Download => (&self.download_subject, &self.download_message),
            NoticeKind::Upload => (&self.upload_subject, &self.upload_message),
        };

        Notice::new(
            subject.clone(),
            format!("{message}\n\nDate range: {range}\nError: {detail}\n"),
        )
    }
}

impl Default for FailureMessages {
    fn default() -> Self {
        Self::from_config(&NotificationConfig::default())
    }
}
