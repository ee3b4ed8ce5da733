//! Dipwatch Core — bars, indicators, dip/reversal evaluation, cooldown gate.
//!
//! This crate contains the signal-detection engine:
//! - Domain types (bars, indicator frames, signal events)
//! - Alert configuration passed explicitly into every component
//! - Data providers (Yahoo Finance chart API, CSV import) and the bar ingestor
//! - Indicator pipeline (Bollinger Bands, RSI, previous close, volume ratio)
//! - Two-stage signal evaluator (dip, then reversal)
//! - Event log trait and the cooldown gate built on top of it
//! - Alert message formatting

pub mod alert;
pub mod config;
pub mod cooldown;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod signals;
pub mod store;

pub use config::{AlertConfig, ConfigError};
pub use cooldown::{CooldownGate, CooldownState};
pub use domain::{Bar, EventKind, IndicatorFrame, SignalEvent};
pub use store::{EventLog, EventLogError, MemoryEventLog, StoredEvent};
