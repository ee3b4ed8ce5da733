//! Signal events: the immutable record of a fired condition.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The two conditions the evaluator can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Close below the lower band on a red candle.
    DipDetected,
    /// Green candle closing back above the lower band right after a dip bar.
    ReversalConfirmed,
}

impl EventKind {
    pub const ALL: [EventKind; 2] = [EventKind::DipDetected, EventKind::ReversalConfirmed];

    /// Label used for persistence and alert titles.
    pub fn label(self) -> &'static str {
        match self {
            EventKind::DipDetected => "Dip Detected",
            EventKind::ReversalConfirmed => "Reversal Confirmed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown event kind: {0}")]
pub struct ParseEventKindError(pub String);

impl FromStr for EventKind {
    type Err = ParseEventKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|k| k.label() == s)
            .ok_or_else(|| ParseEventKindError(s.to_string()))
    }
}

/// A fired condition, snapshotting the bar values that triggered it.
///
/// Created by the evaluator, appended to the event log, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    /// Timestamp of the bar that fired.
    pub timestamp: DateTime<Tz>,
    pub kind: EventKind,
    pub close: f64,
    pub band_lower: f64,
    pub rsi: f64,
    /// `None` when volume is unavailable for the bar or its trailing window.
    pub volume_ratio: Option<f64>,
    /// Close vs previous close, in percent.
    pub percent_change: f64,
    /// Wall-clock time the event was created.
    pub logged_at: DateTime<Tz>,
}

/// Percent change of `close` against `close_prev`, 0 when the previous close is 0.
pub fn percent_change(close: f64, close_prev: f64) -> f64 {
    if close_prev == 0.0 {
        0.0
    } else {
        (close - close_prev) / close_prev * 100.0
    }
}
