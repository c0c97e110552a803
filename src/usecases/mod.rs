//! Application use cases. Orchestrate domain logic via ports.

pub mod monitor_service;
pub mod notifications;
pub mod prompt;

pub use monitor_service::MonitorService;
