//! Port traits. API boundaries for the hexagon.
//!
//! - Outbound: Called by application into infrastructure (web, AI, mail)

pub mod outbound;

pub use outbound::{AiPort, MailerPort, PagePort};
