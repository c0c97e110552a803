//! reqwest-based implementation of PagePort.

use crate::adapters::web::text_extract::{extract_text, truncate_chars};
use crate::domain::{DomainError, PageSnapshot};
use crate::ports::PagePort;
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info};

/// Desktop browser UA; some club sites serve a stripped page to unknown agents.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Fetches pages over HTTP and reduces them to plain text.
pub struct HttpPageFetcher {
    client: reqwest::Client,
    max_chars: usize,
}

impl HttpPageFetcher {
    /// # Arguments
    /// * `timeout` - Whole-request timeout
    /// * `max_chars` - Extracted text is cut to this many characters
    pub fn new(timeout: Duration, max_chars: usize) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DomainError::Fetch(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, max_chars })
    }
}

#[async_trait::async_trait]
impl PagePort for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<PageSnapshot, DomainError> {
        debug!(url, "fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::Fetch(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Fetch(format!("{} returned {}", url, status)));
        }

        let html = response
            .text()
            .await
            .map_err(|e| DomainError::Fetch(format!("Failed to read body: {}", e)))?;

        let full = extract_text(&html);
        let text = truncate_chars(&full, self.max_chars).to_string();

        info!(
            url,
            chars = full.chars().count(),
            kept = text.chars().count(),
            "fetched website content"
        );

        Ok(PageSnapshot {
            url: url.to_string(),
            text,
            fetched_at: Utc::now().timestamp(),
        })
    }
}
