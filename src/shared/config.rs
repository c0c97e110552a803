//! Application configuration. Target page, AI provider, SMTP credentials.

use crate::adapters::ai::{DEFAULT_ANTHROPIC_URL, DEFAULT_OPENAI_URL};
use crate::domain::{DomainError, WatchTarget};
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_TARGET_URL: &str = "https://www.glimt.no";
pub const DEFAULT_SITE_NAME: &str = "Bodø/Glimt";
pub const DEFAULT_EVENT_NAME: &str = "Tottenham";
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
/// Page text is cut to this many characters before it goes into the prompt.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 10_000;
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_AI_MAX_TOKENS: u32 = 500;
pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Which AI backend answers the ticket question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiProvider {
    #[default]
    Anthropic,
    OpenAi,
    Mock,
}

impl FromStr for AiProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(AiProvider::Anthropic),
            "openai" => Ok(AiProvider::OpenAi),
            "mock" => Ok(AiProvider::Mock),
            other => Err(DomainError::Config(format!(
                "unknown AI provider '{}' (expected anthropic, openai or mock)",
                other
            ))),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Target
    // ─────────────────────────────────────────────────────────────────────────
    /// Page to watch. Read from TICKET_WATCH_TARGET_URL.
    #[serde(default)]
    pub target_url: Option<String>,

    /// Club/site name used in the prompt and email subjects. Read from TICKET_WATCH_SITE_NAME.
    #[serde(default)]
    pub site_name: Option<String>,

    /// Match/event looked for on the page. Read from TICKET_WATCH_EVENT_NAME.
    #[serde(default)]
    pub event_name: Option<String>,

    /// Seconds between checks (default 3600). Read from TICKET_WATCH_CHECK_INTERVAL_SECS.
    #[serde(default)]
    pub check_interval_secs: Option<u64>,

    /// HTTP timeout for the page fetch (default 30). Read from TICKET_WATCH_FETCH_TIMEOUT_SECS.
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,

    /// Max characters of page text sent to the AI. Read from TICKET_WATCH_MAX_CONTENT_CHARS.
    #[serde(default)]
    pub max_content_chars: Option<usize>,

    // ─────────────────────────────────────────────────────────────────────────
    // AI Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// anthropic | openai | mock. Read from TICKET_WATCH_AI_PROVIDER.
    #[serde(default)]
    pub ai_provider: Option<String>,

    /// AI API key. Read from TICKET_WATCH_AI_API_KEY; ANTHROPIC_API_KEY overrides it
    /// for the Anthropic provider. Optional for OpenAI-compatible custom endpoints.
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// Endpoint override. Defaults per provider. Read from TICKET_WATCH_AI_API_URL.
    #[serde(default)]
    pub ai_api_url: Option<String>,

    /// Model override. Defaults per provider. Read from TICKET_WATCH_AI_MODEL.
    #[serde(default)]
    pub ai_model: Option<String>,

    /// Reply token cap (default 500). Read from TICKET_WATCH_AI_MAX_TOKENS.
    #[serde(default)]
    pub ai_max_tokens: Option<u32>,

    // ─────────────────────────────────────────────────────────────────────────
    // Email Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// Read from SMTP_SERVER (default smtp.gmail.com).
    #[serde(default)]
    pub smtp_server: Option<String>,

    /// Read from SMTP_PORT (default 587).
    #[serde(default)]
    pub smtp_port: Option<u16>,

    /// Sender and SMTP login. Read from FROM_EMAIL.
    #[serde(default)]
    pub from_email: Option<String>,

    /// Read from EMAIL_PASSWORD.
    #[serde(default)]
    pub email_password: Option<String>,

    /// Recipient. Read from TO_EMAIL.
    #[serde(default)]
    pub to_email: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Behaviour
    // ─────────────────────────────────────────────────────────────────────────
    /// Log emails instead of sending. Read from TICKET_WATCH_DRY_RUN.
    #[serde(default)]
    pub dry_run: Option<bool>,

    /// Single check, then exit. Read from TICKET_WATCH_RUN_ONCE.
    #[serde(default)]
    pub run_once: Option<bool>,

    /// Skip repeat availability emails while the verdict is unchanged.
    /// Read from TICKET_WATCH_NOTIFY_ON_CHANGE_ONLY.
    #[serde(default)]
    pub notify_on_change_only: Option<bool>,
}

/// Copy an unprefixed variable into `slot` when set and non-empty.
/// A value that does not parse is logged and leaves `slot` untouched.
fn env_override<T: FromStr>(
    slot: &mut Option<T>,
    name: &str,
    lookup: &impl Fn(&str) -> Option<String>,
) {
    let Some(raw) = lookup(name) else {
        return;
    };
    let value = raw.trim();
    if value.is_empty() {
        return;
    }
    match value.parse::<T>() {
        Ok(v) => *slot = Some(v),
        Err(_) => warn!(var = name, value, "ignoring unparsable environment variable"),
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let file = std::env::var("TICKET_WATCH_CONFIG").ok();
        let mut cfg = Self::from_sources(
            config::Environment::with_prefix("TICKET_WATCH").try_parsing(true),
            file.as_deref(),
        )?;
        cfg.apply_unprefixed_overrides(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Prefixed environment plus an optional config file.
    fn from_sources(
        env: config::Environment,
        file: Option<&str>,
    ) -> Result<Self, config::ConfigError> {
        let mut c = config::Config::builder().add_source(env);
        if let Some(path) = file {
            c = c.add_source(config::File::with_name(path));
        }
        c.build()?.try_deserialize()
    }

    /// Unprefixed names so an existing .env (ANTHROPIC_API_KEY=..., TO_EMAIL=...) works as-is.
    /// They take precedence over the TICKET_WATCH_ values.
    ///
    /// ANTHROPIC_API_KEY is only picked up for the Anthropic provider.
    pub fn apply_unprefixed_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.ai_provider().ok() == Some(AiProvider::Anthropic) {
            env_override(&mut self.ai_api_key, "ANTHROPIC_API_KEY", &lookup);
        }
        env_override(&mut self.smtp_server, "SMTP_SERVER", &lookup);
        env_override(&mut self.smtp_port, "SMTP_PORT", &lookup);
        env_override(&mut self.from_email, "FROM_EMAIL", &lookup);
        env_override(&mut self.email_password, "EMAIL_PASSWORD", &lookup);
        env_override(&mut self.to_email, "TO_EMAIL", &lookup);
    }

    /// Environment variable names of required settings that are missing or empty.
    ///
    /// The mock provider needs no AI key, nor does an OpenAI-compatible provider
    /// pointed at a custom endpoint (e.g. local Ollama). Mail settings are not
    /// needed in dry-run mode.
    pub fn missing_required(&self) -> Vec<&'static str> {
        fn blank(v: &Option<String>) -> bool {
            v.as_deref().is_none_or(|s| s.trim().is_empty())
        }

        let mut missing = Vec::new();
        if blank(&self.ai_api_key) {
            match self.ai_provider() {
                Ok(AiProvider::Anthropic) => missing.push("ANTHROPIC_API_KEY"),
                Ok(AiProvider::OpenAi) if blank(&self.ai_api_url) => {
                    missing.push("TICKET_WATCH_AI_API_KEY")
                }
                _ => {}
            }
        }
        if !self.dry_run() {
            if blank(&self.from_email) {
                missing.push("FROM_EMAIL");
            }
            if blank(&self.email_password) {
                missing.push("EMAIL_PASSWORD");
            }
            if blank(&self.to_email) {
                missing.push("TO_EMAIL");
            }
        }
        missing
    }

    /// Fail with a config error listing every missing variable, or an invalid provider.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.ai_provider()?;
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn watch_target(&self) -> WatchTarget {
        WatchTarget {
            url: self
                .target_url
                .clone()
                .unwrap_or_else(|| DEFAULT_TARGET_URL.to_string()),
            site_name: self
                .site_name
                .clone()
                .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
            event_name: self
                .event_name
                .clone()
                .unwrap_or_else(|| DEFAULT_EVENT_NAME.to_string()),
        }
    }

    /// Returns the check interval. Defaults to one hour if unset or zero.
    pub fn check_interval_or_default(&self) -> Duration {
        Duration::from_secs(
            self.check_interval_secs
                .filter(|s| *s > 0)
                .unwrap_or(DEFAULT_CHECK_INTERVAL_SECS),
        )
    }

    pub fn fetch_timeout_or_default(&self) -> Duration {
        Duration::from_secs(
            self.fetch_timeout_secs
                .filter(|s| *s > 0)
                .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
        )
    }

    pub fn max_content_chars_or_default(&self) -> usize {
        self.max_content_chars
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONTENT_CHARS)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // AI Configuration Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Parsed provider; Anthropic when unset.
    pub fn ai_provider(&self) -> Result<AiProvider, DomainError> {
        match self.ai_provider.as_deref() {
            None => Ok(AiProvider::default()),
            Some(s) if s.trim().is_empty() => Ok(AiProvider::default()),
            Some(s) => s.parse(),
        }
    }

    pub fn ai_api_key(&self) -> Option<String> {
        self.ai_api_key.clone().filter(|k| !k.trim().is_empty())
    }

    /// Returns the AI API URL. Defaults to the provider's public endpoint.
    pub fn ai_api_url_or_default(&self, provider: AiProvider) -> String {
        self.ai_api_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| {
                match provider {
                    AiProvider::OpenAi => DEFAULT_OPENAI_URL,
                    AiProvider::Anthropic | AiProvider::Mock => DEFAULT_ANTHROPIC_URL,
                }
                .to_string()
            })
    }

    /// Returns the AI model name. Defaults per provider.
    pub fn ai_model_or_default(&self, provider: AiProvider) -> String {
        self.ai_model.clone().unwrap_or_else(|| {
            match provider {
                AiProvider::OpenAi => DEFAULT_OPENAI_MODEL,
                AiProvider::Anthropic | AiProvider::Mock => DEFAULT_ANTHROPIC_MODEL,
            }
            .to_string()
        })
    }

    pub fn ai_max_tokens_or_default(&self) -> u32 {
        self.ai_max_tokens.unwrap_or(DEFAULT_AI_MAX_TOKENS)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Email Configuration Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn smtp_server_or_default(&self) -> String {
        self.smtp_server
            .clone()
            .unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string())
    }

    pub fn smtp_port_or_default(&self) -> u16 {
        self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT)
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run.unwrap_or(false)
    }

    pub fn run_once(&self) -> bool {
        self.run_once.unwrap_or(false)
    }

    pub fn notify_on_change_only(&self) -> bool {
        self.notify_on_change_only.unwrap_or(false)
    }
}
