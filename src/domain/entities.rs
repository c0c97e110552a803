//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/SMTP types here; adapters map into these.

use std::fmt;

/// Marker the AI must emit when tickets are on general sale.
pub const MARKER_TICKETS_AVAILABLE: &str = "TICKETS_AVAILABLE";
/// Marker for "tickets exist but not for the general public (or none at all)".
pub const MARKER_NO_TICKETS: &str = "NO_TICKETS";
/// Marker for "the page says nothing about the event".
pub const MARKER_NO_INFO: &str = "NO_INFO";

/// The page being watched and the event we care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    pub url: String,
    /// Human name of the site/club, e.g. "Bodø/Glimt".
    pub site_name: String,
    /// Opponent or event name looked for on the page, e.g. "Tottenham".
    pub event_name: String,
}

/// Plain text of a fetched page, already cleaned and truncated.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub url: String,
    pub text: String,
    /// Unix seconds.
    pub fetched_at: i64,
}

/// What the AI concluded about ticket availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    TicketsAvailable,
    NoTickets,
    NoInfo,
    Unclear,
}

impl Verdict {
    /// Classify a free-text AI reply by marker substring.
    ///
    /// Markers are checked in order `TICKETS_AVAILABLE`, `NO_TICKETS`, `NO_INFO`;
    /// the first one present wins. A reply with none of them is `Unclear`.
    pub fn from_reply(reply: &str) -> Self {
        if reply.contains(MARKER_TICKETS_AVAILABLE) {
            Verdict::TicketsAvailable
        } else if reply.contains(MARKER_NO_TICKETS) {
            Verdict::NoTickets
        } else if reply.contains(MARKER_NO_INFO) {
            Verdict::NoInfo
        } else {
            Verdict::Unclear
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::TicketsAvailable => "tickets_available",
            Verdict::NoTickets => "no_tickets",
            Verdict::NoInfo => "no_info",
            Verdict::Unclear => "unclear",
        };
        f.write_str(s)
    }
}

/// AI reply paired with its parsed verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub verdict: Verdict,
    /// Raw reply text (or the error description if the AI call failed).
    pub text: String,
}

impl Analysis {
    pub fn from_reply(text: String) -> Self {
        Self {
            verdict: Verdict::from_reply(&text),
            text,
        }
    }
}

/// An email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

/// Outcome of one monitor iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckReport {
    /// `None` when the page could not be fetched.
    pub verdict: Option<Verdict>,
    /// True if an email was actually delivered to the mailer.
    pub notified: bool,
}
