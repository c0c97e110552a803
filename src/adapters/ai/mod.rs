//! AI adapter module. Implements AiPort for LLM integration.
//!
//! Provides Anthropic and OpenAI-compatible adapters and a mock adapter for testing.

pub mod anthropic_adapter;
pub mod mock_adapter;
pub mod openai_adapter;

pub use anthropic_adapter::{AnthropicAdapter, DEFAULT_ANTHROPIC_URL};
pub use mock_adapter::MockAiAdapter;
pub use openai_adapter::{DEFAULT_OPENAI_URL, OpenAiAdapter};
