//! Dry-run mailer: logs notifications instead of sending them.

use crate::domain::{DomainError, Notification};
use crate::ports::MailerPort;
use tracing::info;

pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MailerPort for LogMailer {
    async fn send(&self, notification: &Notification) -> Result<(), DomainError> {
        info!(
            subject = %notification.subject,
            body = %notification.body,
            "[DRY RUN] email not sent"
        );
        Ok(())
    }
}
