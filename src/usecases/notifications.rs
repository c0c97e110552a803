//! Email composition for monitor outcomes.
//!
//! Availability always produces an email. Every other outcome only reports
//! on the first run, so the recipient knows the monitor is alive.

use crate::domain::{Analysis, Notification, Verdict, WatchTarget};
use std::time::Duration;

/// Inputs shared by every message.
pub struct MessageContext<'a> {
    pub target: &'a WatchTarget,
    pub interval: Duration,
    /// Preformatted local time, e.g. "2025-08-01 14:00:00".
    pub timestamp: &'a str,
}

impl MessageContext<'_> {
    fn site_upper(&self) -> String {
        self.target.site_name.to_uppercase()
    }

    fn event_upper(&self) -> String {
        self.target.event_name.to_uppercase()
    }
}

/// Human form of the check interval ("hour", "30 minutes", ...).
pub fn describe_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    match secs {
        3600 => "hour".to_string(),
        60 => "minute".to_string(),
        s if s > 0 && s % 3600 == 0 => format!("{} hours", s / 3600),
        s if s > 0 && s % 60 == 0 => format!("{} minutes", s / 60),
        s => format!("{} seconds", s),
    }
}

/// Startup email when the very first fetch fails.
pub fn fetch_failed(ctx: &MessageContext<'_>) -> Notification {
    Notification {
        subject: format!("❌ {} MONITOR STARTED - ERROR", ctx.site_upper()),
        body: format!(
            "The ticket monitor has started but failed to fetch website content.\n\n\
             URL: {}\n\nTime: {}\n",
            ctx.target.url, ctx.timestamp
        ),
    }
}

/// Pick the email (if any) for an analysis outcome.
pub fn for_analysis(
    ctx: &MessageContext<'_>,
    analysis: &Analysis,
    is_first_run: bool,
) -> Option<Notification> {
    let every = describe_interval(ctx.interval);
    let site = &ctx.target.site_name;
    let event = &ctx.target.event_name;

    match analysis.verdict {
        Verdict::TicketsAvailable => Some(Notification {
            subject: format!(
                "🎫 {} vs {} TICKETS AVAILABLE!",
                ctx.site_upper(),
                ctx.event_upper()
            ),
            body: format!(
                "Great news! Tickets appear to be available for the {site} vs {event} match!\n\n\
                 Analysis:\n{}\n\n\
                 Check the website immediately: {}\n\n\
                 Time checked: {}\n",
                analysis.text, ctx.target.url, ctx.timestamp
            ),
        }),
        _ if !is_first_run => None,
        Verdict::NoTickets => Some(Notification {
            subject: format!("✅ {} MONITOR STARTED - NO TICKETS YET", ctx.site_upper()),
            body: format!(
                "The {site} ticket monitor has started successfully!\n\n\
                 Current status: No tickets available for ordinary people yet.\n\n\
                 Analysis:\n{}\n\n\
                 The monitor will check every {every} and notify you when tickets become available.\n\n\
                 Time started: {}\n",
                analysis.text, ctx.timestamp
            ),
        }),
        Verdict::NoInfo => Some(Notification {
            subject: format!(
                "⚠️ {} MONITOR STARTED - NO {} INFO",
                ctx.site_upper(),
                ctx.event_upper()
            ),
            body: format!(
                "The {site} ticket monitor has started successfully!\n\n\
                 Current status: No clear information about the {event} match found on the website.\n\n\
                 Analysis:\n{}\n\n\
                 The monitor will check every {every} and notify you when information becomes available.\n\n\
                 Time started: {}\n",
                analysis.text, ctx.timestamp
            ),
        }),
        Verdict::Unclear => Some(Notification {
            subject: format!("⚠️ {} MONITOR STARTED - UNCLEAR RESPONSE", ctx.site_upper()),
            body: format!(
                "The {site} ticket monitor has started but received an unclear response from the AI.\n\n\
                 Analysis response:\n{}\n\n\
                 The monitor will continue checking every {every}.\n\n\
                 Time started: {}\n",
                analysis.text, ctx.timestamp
            ),
        }),
    }
}
