//! SMTP notifier built on lettre's Tokio transport

use super::traits::{Notice, Notifier};
use crate::config::{NotificationConfig, SmtpSecurity};
use crate::domain::{AppError, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;
use std::time::Duration;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends notices as plain-text email
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
    relay: String,
}

impl EmailNotifier {
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] for unparsable mailboxes or an
    /// unusable relay host.
    pub fn new(config: &NotificationConfig) -> Result<Self> {
        let from = parse_mailbox(&config.from)?;
        let to = config
            .to
            .iter()
            .map(|address| parse_mailbox(address))
            .collect::<Result<Vec<_>>>()?;

        let host = config.smtp_host.as_str();
        let mut builder = match config.smtp_security {
            SmtpSecurity::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| AppError::Configuration(format!("SMTP relay {host}: {e}")))?,
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| AppError::Configuration(format!("SMTP relay {host}: {e}")))?,
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
        }
        .port(config.smtp_port)
        .timeout(Some(SMTP_TIMEOUT));

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(
                username.clone(),
                password.expose_secret().as_str().to_string(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
            relay: format!("{host}:{}", config.smtp_port),
        })
    }

    /// Build the email for `notice`
    pub fn message(&self, notice: &Notice) -> Result<Message> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(notice.subject.as_str())
            .header(ContentType::TEXT_PLAIN);
        for recipient in &self.to {
            builder = builder.to(recipient.clone());
        }

        builder
            .body(notice.body.clone())
            .map_err(|e| AppError::Notification(format!("Could not build email: {e}")))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse::<Mailbox>()
        .map_err(|e| AppError::Configuration(format!("Invalid mailbox '{address}': {e}")))
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn channel(&self) -> &'static str {
        "email"
    }

    async fn notify(&self, notice: &Notice) -> Result<()> {
        let message = self.message(notice)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Notification(format!("SMTP {}: {e}", self.relay)))?;

        tracing::info!(
            relay = %self.relay,
            recipients = self.to.len(),
            subject = %notice.subject,
            "Failure notification sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn config(port: u16) -> NotificationConfig {
        NotificationConfig {
            enabled: true,
            smtp_host: "127.0.0.1".to_string(),
            smtp_port: port,
            smtp_security: SmtpSecurity::None,
            from: "Data Export <export@example.com>".to_string(),
            to: vec!["ops@example.com".to_string(), "dba@example.com".to_string()],
            ..NotificationConfig::default()
        }
    }

    #[test]
    fn test_message_has_all_recipients() {
        let notifier = EmailNotifier::new(&config(25)).unwrap();
        let message = notifier
            .message(&Notice::new("Upload failed", "details"))
            .unwrap();

        let envelope = message.envelope();
        assert_eq!(envelope.to().len(), 2);
        assert_eq!(
            envelope.from().map(ToString::to_string).as_deref(),
            Some("export@example.com")
        );

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Upload failed"));
    }

    #[test]
    fn test_invalid_recipient_is_config_error() {
        let mut config = config(25);
        config.to = vec!["not an address".to_string()];
        assert!(matches!(
            EmailNotifier::new(&config),
            Err(AppError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_notification_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let notifier = EmailNotifier::new(&config(port)).unwrap();
        let result = notifier.notify(&Notice::new("s", "b")).await;
        assert!(matches!(result, Err(AppError::Notification(_))));
    }
}
