//! Notifier used when email is disabled

use super::traits::{Notice, Notifier};
use crate::domain::Result;
use async_trait::async_trait;

/// Writes notices to the log instead of sending them
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn channel(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, notice: &Notice) -> Result<()> {
        tracing::warn!(
            subject = %notice.subject,
            body = %notice.body,
            "Email notification disabled; failure notice logged only"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        let notifier = LogNotifier;
        assert_eq!(notifier.channel(), "log");
        assert!(notifier.notify(&Notice::new("s", "b")).await.is_ok());
    }
}
