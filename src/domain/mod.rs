//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;

pub use entities::{
    Analysis, CheckReport, Notification, PageSnapshot, Verdict, WatchTarget,
    MARKER_NO_INFO, MARKER_NO_TICKETS, MARKER_TICKETS_AVAILABLE,
};
pub use errors::DomainError;
