//! Shared configuration types for dropwatch.
//!
//! These types are persisted as TOML by the monitor binary and consumed by
//! the core library, so both sides agree on field names and defaults.

pub mod config;
pub mod formatting;

pub use config::{DiscordConfig, Language, MonitorConfig};
