//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, Notification, PageSnapshot};

/// Web gateway. Fetches a page and reduces it to plain text.
#[async_trait::async_trait]
pub trait PagePort: Send + Sync {
    /// Fetch `url` and return its cleaned, truncated text content.
    async fn fetch_page(&self, url: &str) -> Result<PageSnapshot, DomainError>;
}

/// AI gateway. Interprets page text for ticket availability.
#[async_trait::async_trait]
pub trait AiPort: Send + Sync {
    /// Send `prompt` to the model and return its raw text reply.
    async fn analyze(&self, prompt: &str) -> Result<String, DomainError>;
}

/// Mail gateway. Delivers a notification to the configured recipient.
#[async_trait::async_trait]
pub trait MailerPort: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), DomainError>;
}
