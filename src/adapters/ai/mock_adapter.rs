//! Mock AI adapter for testing without API calls.
//!
//! Returns a fixed reply for development and offline runs.

use crate::domain::{DomainError, MARKER_NO_INFO};
use crate::ports::AiPort;
use std::time::Duration;
use tracing::info;

/// Mock AI adapter for testing.
///
/// Returns a predetermined reply without making API calls.
/// Simulates network latency with configurable delay.
pub struct MockAiAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
    reply: String,
}

impl MockAiAdapter {
    /// Create a new mock adapter with default delay (100ms) and a `NO_INFO` reply.
    pub fn new() -> Self {
        Self {
            delay_ms: 100,
            reply: format!(
                "{}\n[MOCK] No AI provider configured; the page content was not analyzed.",
                MARKER_NO_INFO
            ),
        }
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::new()
        }
    }

    /// Replace the canned reply.
    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = reply.into();
        self
    }
}

impl Default for MockAiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AiPort for MockAiAdapter {
    async fn analyze(&self, prompt: &str) -> Result<String, DomainError> {
        info!(prompt_len = prompt.len(), "[MOCK] Simulating AI analysis");

        // Simulate network delay
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        Ok(self.reply.clone())
    }
}
