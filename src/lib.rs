//! ticket-watch: poll a club website, ask an LLM whether match tickets are on
//! general sale, and email when they are. Hexagonal layout: domain, ports,
//! adapters, use cases.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
