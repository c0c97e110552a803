//! Monitor (daemon) use case: fetch the target page, ask the AI about tickets,
//! email when they are on sale, sleep, repeat.
//!
//! Orchestrates PagePort, AiPort, and MailerPort. Does not block the runtime; uses tokio::time::sleep.

use crate::domain::{Analysis, CheckReport, DomainError, Notification, Verdict, WatchTarget};
use crate::ports::{AiPort, MailerPort, PagePort};
use crate::usecases::notifications::{self, MessageContext};
use crate::usecases::prompt::ticket_prompt;
use chrono::Local;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Monitor service. Runs a loop: fetch -> analyze -> maybe notify -> sleep.
pub struct MonitorService {
    page: Arc<dyn PagePort>,
    ai: Arc<dyn AiPort>,
    mailer: Arc<dyn MailerPort>,
    target: WatchTarget,
    /// Sleep duration between checks.
    interval: Duration,
    /// Suppress repeat availability emails while tickets stay available.
    notify_on_change_only: bool,
    /// Set once an availability email was delivered; cleared by any other verdict.
    availability_alerted: Mutex<bool>,
}

impl MonitorService {
    pub fn new(
        page: Arc<dyn PagePort>,
        ai: Arc<dyn AiPort>,
        mailer: Arc<dyn MailerPort>,
        target: WatchTarget,
        interval: Duration,
    ) -> Self {
        Self {
            page,
            ai,
            mailer,
            target,
            interval,
            notify_on_change_only: false,
            availability_alerted: Mutex::new(false),
        }
    }

    pub fn with_notify_on_change_only(mut self, enabled: bool) -> Self {
        self.notify_on_change_only = enabled;
        self
    }

    /// Run one check. Failures of the individual steps are logged, never returned.
    pub async fn check(&self, is_first_run: bool) -> CheckReport {
        info!(url = %self.target.url, is_first_run, "starting ticket availability check");
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let ctx = MessageContext {
            target: &self.target,
            interval: self.interval,
            timestamp: &timestamp,
        };

        let page = match self.page.fetch_page(&self.target.url).await {
            Ok(page) => page,
            Err(e) => {
                error!(url = %self.target.url, error = %e, "failed to fetch website content");
                let notified = if is_first_run {
                    self.deliver(&notifications::fetch_failed(&ctx)).await
                } else {
                    false
                };
                return CheckReport {
                    verdict: None,
                    notified,
                };
            }
        };

        let analysis = self.analyze(&page.text).await;
        match analysis.verdict {
            Verdict::TicketsAvailable => info!("tickets appear to be available"),
            Verdict::NoTickets => info!("no tickets available for ordinary people yet"),
            Verdict::NoInfo => info!(event = %self.target.event_name, "no clear information about the match"),
            Verdict::Unclear => warn!("unclear response from AI analysis"),
        }

        let available = analysis.verdict == Verdict::TicketsAvailable;
        let mut alerted = self.availability_alerted.lock().await;
        if !available {
            *alerted = false;
        }
        let repeat = self.notify_on_change_only && available && *alerted;

        let notified = match notifications::for_analysis(&ctx, &analysis, is_first_run) {
            Some(_) if repeat && !is_first_run => {
                info!(verdict = %analysis.verdict, "availability already reported; notification suppressed");
                false
            }
            Some(notification) => self.deliver(&notification).await,
            None => false,
        };
        if available && notified {
            *alerted = true;
        }

        CheckReport {
            verdict: Some(analysis.verdict),
            notified,
        }
    }

    /// Run the monitor loop: one first-run check, then one check per interval
    /// until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F) -> Result<(), DomainError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        info!(url = %self.target.url, "running initial ticket check");
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("monitor stopped");
                return Ok(());
            }
            _ = self.check(true) => {}
        }

        info!(
            interval_secs = self.interval.as_secs(),
            "scheduler started; checking every {}",
            notifications::describe_interval(self.interval)
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = self.check(false) => {}
            }
        }

        info!("monitor stopped");
        Ok(())
    }

    /// Ask the AI; on failure the error text stands in for the reply and the verdict is unclear.
    async fn analyze(&self, page_text: &str) -> Analysis {
        let prompt = ticket_prompt(&self.target, page_text);
        match self.ai.analyze(&prompt).await {
            Ok(reply) => {
                info!(reply = %reply, "AI analysis");
                Analysis::from_reply(reply)
            }
            Err(e) => {
                error!(error = %e, "error analyzing content with AI");
                Analysis {
                    verdict: Verdict::Unclear,
                    text: format!("ERROR: {}", e),
                }
            }
        }
    }

    /// Send and report success. Mail errors do not abort the check.
    async fn deliver(&self, notification: &Notification) -> bool {
        match self.mailer.send(notification).await {
            Ok(()) => {
                info!(subject = %notification.subject, "notification sent");
                true
            }
            Err(e) => {
                error!(subject = %notification.subject, error = %e, "error sending email");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageSnapshot;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves fixed text, or fails when `fail` is set.
    struct FakePage {
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl PagePort for FakePage {
        async fn fetch_page(&self, url: &str) -> Result<PageSnapshot, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DomainError::Fetch("connection refused".into()));
            }
            Ok(PageSnapshot {
                url: url.to_string(),
                text: "Billetter Tottenham".into(),
                fetched_at: 0,
            })
        }
    }

    /// Replays scripted replies; repeats the last one when exhausted.
    struct ScriptedAi {
        replies: StdMutex<VecDeque<Result<String, String>>>,
    }

    impl ScriptedAi {
        fn new(replies: &[Result<&str, &str>]) -> Self {
            Self {
                replies: StdMutex::new(
                    replies
                        .iter()
                        .map(|r| r.map(str::to_string).map_err(str::to_string))
                        .collect(),
                ),
            }
        }
    }

    #[async_trait::async_trait]
    impl AiPort for ScriptedAi {
        async fn analyze(&self, prompt: &str) -> Result<String, DomainError> {
            assert!(prompt.contains("Billetter Tottenham"));
            let mut q = self.replies.lock().unwrap();
            let next = if q.len() > 1 {
                q.pop_front().unwrap()
            } else {
                q.front().cloned().unwrap()
            };
            next.map_err(DomainError::Ai)
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        /// Number of upcoming sends that fail before delivery recovers.
        failures_left: AtomicUsize,
        sent: StdMutex<Vec<Notification>>,
        delivered: AtomicUsize,
    }

    impl RecordingMailer {
        fn failing(times: usize) -> Self {
            Self {
                failures_left: AtomicUsize::new(times),
                ..Default::default()
            }
        }
    }

    #[async_trait::async_trait]
    impl MailerPort for RecordingMailer {
        async fn send(&self, notification: &Notification) -> Result<(), DomainError> {
            self.sent.lock().unwrap().push(notification.clone());
            let failing = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                Err(DomainError::Mail("535 auth failed".into()))
            } else {
                self.delivered.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }
    }

    fn target() -> WatchTarget {
        WatchTarget {
            url: "https://www.glimt.no".into(),
            site_name: "Bodø/Glimt".into(),
            event_name: "Tottenham".into(),
        }
    }

    fn service(
        page_fails: bool,
        ai: ScriptedAi,
        mailer: Arc<RecordingMailer>,
    ) -> (MonitorService, Arc<FakePage>) {
        let page = Arc::new(FakePage {
            fail: page_fails,
            calls: AtomicUsize::new(0),
        });
        let svc = MonitorService::new(
            page.clone(),
            Arc::new(ai),
            mailer,
            target(),
            Duration::from_secs(3600),
        );
        (svc, page)
    }

    fn subjects(mailer: &RecordingMailer) -> Vec<String> {
        mailer
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.subject.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_email_iff_availability_on_regular_runs() {
        let cases = [
            ("TICKETS_AVAILABLE: general sale", true),
            ("NO_TICKETS: members only", false),
            ("NO_INFO", false),
            ("no idea", false),
        ];
        for (reply, expect_mail) in cases {
            let mailer = Arc::new(RecordingMailer::default());
            let (svc, _) = service(false, ScriptedAi::new(&[Ok(reply)]), mailer.clone());

            let report = svc.check(false).await;

            assert_eq!(report.notified, expect_mail, "reply: {reply}");
            assert_eq!(mailer.sent.lock().unwrap().len(), usize::from(expect_mail));
        }
    }

    #[tokio::test]
    async fn test_first_run_reports_status() {
        let mailer = Arc::new(RecordingMailer::default());
        let (svc, _) = service(false, ScriptedAi::new(&[Ok("NO_TICKETS")]), mailer.clone());

        let report = svc.check(true).await;

        assert_eq!(report.verdict, Some(Verdict::NoTickets));
        assert!(report.notified);
        assert_eq!(
            subjects(&mailer),
            vec!["✅ BODØ/GLIMT MONITOR STARTED - NO TICKETS YET".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_emails_only_on_first_run() {
        let mailer = Arc::new(RecordingMailer::default());
        let (svc, _) = service(true, ScriptedAi::new(&[Ok("unused")]), mailer.clone());

        let first = svc.check(true).await;
        let later = svc.check(false).await;

        assert_eq!(first.verdict, None);
        assert!(first.notified);
        assert_eq!(later.verdict, None);
        assert!(!later.notified);
        assert_eq!(
            subjects(&mailer),
            vec!["❌ BODØ/GLIMT MONITOR STARTED - ERROR".to_string()]
        );
    }

    #[tokio::test]
    async fn test_ai_failure_is_unclear() {
        let mailer = Arc::new(RecordingMailer::default());
        let (svc, _) = service(false, ScriptedAi::new(&[Err("timeout")]), mailer.clone());

        let report = svc.check(true).await;

        assert_eq!(report.verdict, Some(Verdict::Unclear));
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].subject.ends_with("UNCLEAR RESPONSE"));
        assert!(sent[0].body.contains("timeout"));
    }

    #[tokio::test]
    async fn test_mail_failure_does_not_abort_check() {
        let mailer = Arc::new(RecordingMailer::failing(1));
        let (svc, _) = service(false, ScriptedAi::new(&[Ok("TICKETS_AVAILABLE")]), mailer.clone());

        let report = svc.check(false).await;

        assert_eq!(report.verdict, Some(Verdict::TicketsAvailable));
        assert!(!report.notified);
        assert_eq!(mailer.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_repeat_availability_emails_by_default() {
        let mailer = Arc::new(RecordingMailer::default());
        let (svc, _) = service(false, ScriptedAi::new(&[Ok("TICKETS_AVAILABLE")]), mailer.clone());

        svc.check(false).await;
        svc.check(false).await;

        assert_eq!(mailer.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_notify_on_change_only_suppresses_repeats() {
        let mailer = Arc::new(RecordingMailer::default());
        let ai = ScriptedAi::new(&[
            Ok("TICKETS_AVAILABLE"),
            Ok("TICKETS_AVAILABLE"),
            Ok("NO_TICKETS"),
            Ok("TICKETS_AVAILABLE"),
        ]);
        let (svc, _) = service(false, ai, mailer.clone());
        let svc = svc.with_notify_on_change_only(true);

        let reports = [
            svc.check(false).await,
            svc.check(false).await,
            svc.check(false).await,
            svc.check(false).await,
        ];

        let notified: Vec<bool> = reports.iter().map(|r| r.notified).collect();
        assert_eq!(notified, vec![true, false, false, true]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_checks_every_interval_until_shutdown() {
        let mailer = Arc::new(RecordingMailer::default());
        let (svc, page) = service(false, ScriptedAi::new(&[Ok("NO_INFO")]), mailer.clone());

        // Initial check at t=0, then at 1h, 2h, 3h; stop at 3.5h.
        svc.run(tokio::time::sleep(Duration::from_secs(3 * 3600 + 1800)))
            .await
            .unwrap();

        assert_eq!(page.calls.load(Ordering::SeqCst), 4);
        // Only the first-run status email.
        assert_eq!(
            subjects(&mailer),
            vec!["⚠️ BODØ/GLIMT MONITOR STARTED - NO TOTTENHAM INFO".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_immediately_on_ready_shutdown() {
        let mailer = Arc::new(RecordingMailer::default());
        let (svc, page) = service(false, ScriptedAi::new(&[Ok("NO_INFO")]), mailer.clone());

        let started = tokio::time::Instant::now();
        svc.run(std::future::ready(())).await.unwrap();

        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(page.calls.load(Ordering::SeqCst), 0);
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notify_on_change_only_retries_after_failed_delivery() {
        let mailer = Arc::new(RecordingMailer::failing(1));
        let (svc, _) = service(false, ScriptedAi::new(&[Ok("TICKETS_AVAILABLE")]), mailer.clone());
        let svc = svc.with_notify_on_change_only(true);

        let first = svc.check(false).await;
        let second = svc.check(false).await;
        let third = svc.check(false).await;

        assert!(!first.notified);
        assert!(second.notified);
        assert!(!third.notified);
        assert_eq!(mailer.delivered.load(Ordering::SeqCst), 1);
    }
}
