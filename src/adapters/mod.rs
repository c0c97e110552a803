//! Infrastructure adapters. Implement outbound ports.
//!
//! Web fetch, AI providers, mail. Map errors to DomainError.

pub mod ai;
pub mod mail;
pub mod web;
