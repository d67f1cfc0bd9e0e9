//! Notifier factory

use super::email::EmailNotifier;
use super::log::LogNotifier;
use super::traits::Notifier;
use crate::config::NotificationConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Email when `notification.enabled`, otherwise log-only
pub fn create_notifier(config: &NotificationConfig) -> Result<Arc<dyn Notifier>> {
    if config.enabled {
        tracing::debug!(
            smtp_host = %config.smtp_host,
            smtp_port = config.smtp_port,
            recipients = config.to.len(),
            "Using email notifications"
        );
        Ok(Arc::new(EmailNotifier::new(config)?))
    } else {
        tracing::debug!("Email notifications disabled");
        Ok(Arc::new(LogNotifier))
    }
}
