//! SMTP mailer via lettre. Implements MailerPort.

use crate::domain::{DomainError, Notification};
use crate::ports::MailerPort;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

/// SMTP connection and addressing settings.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    /// Sender address; also the SMTP login.
    pub from_email: String,
    pub password: String,
    pub to_email: String,
}

/// Sends plain-text mail through a STARTTLS relay.
pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    /// Build the RFC 5322 message for a notification.
    pub fn build_message(&self, notification: &Notification) -> Result<Message, DomainError> {
        Message::builder()
            .from(
                self.settings
                    .from_email
                    .parse()
                    .map_err(|e| DomainError::Mail(format!("Invalid from address: {e}")))?,
            )
            .to(self
                .settings
                .to_email
                .parse()
                .map_err(|e| DomainError::Mail(format!("Invalid to address: {e}")))?)
            .subject(notification.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())
            .map_err(|e| DomainError::Mail(format!("Failed to build email: {e}")))
    }

    fn transport(&self) -> Result<SmtpTransport, DomainError> {
        let creds = Credentials::new(
            self.settings.from_email.clone(),
            self.settings.password.clone(),
        );
        Ok(SmtpTransport::starttls_relay(&self.settings.server)
            .map_err(|e| DomainError::Mail(format!("SMTP relay error: {e}")))?
            .port(self.settings.port)
            .credentials(creds)
            .build())
    }
}

#[async_trait::async_trait]
impl MailerPort for SmtpMailer {
    async fn send(&self, notification: &Notification) -> Result<(), DomainError> {
        let email = self.build_message(notification)?;
        let transport = self.transport()?;

        // lettre's SmtpTransport blocks; keep it off the runtime threads.
        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| DomainError::Mail(format!("SMTP task failed: {e}")))?
            .map_err(|e| DomainError::Mail(format!("SMTP send failed: {e}")))?;

        info!(to = %self.settings.to_email, "email sent successfully");
        Ok(())
    }
}
