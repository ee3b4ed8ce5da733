//! Dipwatch Runner — run-once orchestration on top of `dipwatch-core`.
//!
//! This crate provides:
//! - The settings file (`[alert]`, `[storage]`, `[notifier]`)
//! - A SQLite event log with embedded migrations
//! - Push transports (Pushover, OneSignal) and a log-only dry run transport
//! - `run_once`, which wires provider, pipeline, evaluator, cooldown gate,
//!   event log and notifier for one scheduled invocation

pub mod config;
pub mod notify;
pub mod runner;
pub mod store;

pub use config::{ConfigError, NotifierSettings, Settings, StorageSettings, Transport};
pub use notify::{build_notifier, LogNotifier, OneSignalNotifier, PushoverNotifier};
pub use runner::{
    run_once, Delivery, EventOutcome, NoDataReason, RunContext, RunError, RunOutcome, RunReport,
};
pub use store::SqliteEventLog;
