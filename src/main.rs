//! Wiring & DI. Entry point: bootstrap adapters, inject into the monitor, run the loop.
//! No business logic here; the check itself lives in MonitorService.

use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use ticket_watch::adapters::ai::{AnthropicAdapter, MockAiAdapter, OpenAiAdapter};
use ticket_watch::adapters::mail::{LogMailer, SmtpMailer, SmtpSettings};
use ticket_watch::adapters::web::HttpPageFetcher;
use ticket_watch::ports::{AiPort, MailerPort, PagePort};
use ticket_watch::shared::config::{AiProvider, AppConfig};
use ticket_watch::usecases::MonitorService;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load()?;
    if let Err(e) = cfg.validate() {
        error!(error = %e, "invalid configuration");
        anyhow::bail!("{}", e);
    }

    let target = cfg.watch_target();
    let interval = cfg.check_interval_or_default();
    info!(
        url = %target.url,
        site = %target.site_name,
        event = %target.event_name,
        interval_secs = interval.as_secs(),
        "watching for ticket sales"
    );

    // --- Page fetcher ---
    let page: Arc<dyn PagePort> = Arc::new(HttpPageFetcher::new(
        cfg.fetch_timeout_or_default(),
        cfg.max_content_chars_or_default(),
    )?);

    // --- AI provider ---
    let provider = cfg.ai_provider()?;
    let ai: Arc<dyn AiPort> = match provider {
        AiProvider::Anthropic => {
            info!(
                model = %cfg.ai_model_or_default(provider),
                url = %cfg.ai_api_url_or_default(provider),
                "AI analysis via Anthropic"
            );
            Arc::new(AnthropicAdapter::new(
                cfg.ai_api_url_or_default(provider),
                cfg.ai_api_key().unwrap_or_default(),
                cfg.ai_model_or_default(provider),
                cfg.ai_max_tokens_or_default(),
            )?)
        }
        AiProvider::OpenAi => {
            info!(
                model = %cfg.ai_model_or_default(provider),
                url = %cfg.ai_api_url_or_default(provider),
                "AI analysis via OpenAI-compatible API"
            );
            Arc::new(OpenAiAdapter::new(
                cfg.ai_api_url_or_default(provider),
                cfg.ai_api_key().unwrap_or_default(),
                cfg.ai_model_or_default(provider),
                cfg.ai_max_tokens_or_default(),
            )?)
        }
        AiProvider::Mock => {
            warn!("AI provider set to mock; page content will not be analyzed");
            Arc::new(MockAiAdapter::new())
        }
    };

    // --- Mailer ---
    let mailer: Arc<dyn MailerPort> = if cfg.dry_run() {
        warn!("dry run: notifications are logged, not sent");
        Arc::new(LogMailer::new())
    } else {
        let settings = SmtpSettings {
            server: cfg.smtp_server_or_default(),
            port: cfg.smtp_port_or_default(),
            from_email: cfg.from_email.clone().unwrap_or_default(),
            password: cfg.email_password.clone().unwrap_or_default(),
            to_email: cfg.to_email.clone().unwrap_or_default(),
        };
        info!(
            server = %settings.server,
            port = settings.port,
            to = %settings.to_email,
            "email notifications via SMTP"
        );
        Arc::new(SmtpMailer::new(settings))
    };

    let monitor = MonitorService::new(page, ai, mailer, target, interval)
        .with_notify_on_change_only(cfg.notify_on_change_only());

    if cfg.run_once() {
        let report = monitor.check(true).await;
        info!(
            verdict = ?report.verdict,
            notified = report.notified,
            "single check complete"
        );
        return Ok(());
    }

    monitor
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
            info!("stopped by user");
        })
        .await?;

    Ok(())
}
