//! Alert messages and the notifier seam.
//!
//! An alert is a title plus a plain-text body. Transports live in the runner;
//! this module only decides what the message says.

use crate::config::AlertConfig;
use crate::domain::{EventKind, SignalEvent};
use thiserror::Error;

/// Placeholder rendered wherever a value is undefined.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("push service rejected the message: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers an alert to an external push service.
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    fn send(&self, alert: &Alert) -> Result<(), NotifyError>;
}

/// Renders events into alerts.
#[derive(Debug, Clone)]
pub struct AlertFormatter {
    display_name: String,
    rsi_window: usize,
    volume_avg_window: usize,
}

impl AlertFormatter {
    pub fn new(display_name: impl Into<String>, config: &AlertConfig) -> Self {
        Self {
            display_name: display_name.into(),
            rsi_window: config.rsi_window,
            volume_avg_window: config.volume_avg_window,
        }
    }

    pub fn format(&self, event: &SignalEvent) -> Alert {
        let marker = match event.kind {
            EventKind::DipDetected => "📉",
            EventKind::ReversalConfirmed => "📈",
        };
        let body = [
            format!("{} {} {marker}", self.display_name, event.kind),
            format!("Close: {:.2} ({:+.2}%)", event.close, event.percent_change),
            format!("Lower band: {:.2}", event.band_lower),
            format!("RSI({}): {:.1}", self.rsi_window, event.rsi),
            format!(
                "Vol/Avg({}): {}",
                self.volume_avg_window,
                format_ratio(event.volume_ratio)
            ),
            format!("Bar: {}", event.timestamp.format("%Y-%m-%d %H:%M %Z")),
        ]
        .join("\n");

        Alert {
            title: format!("{} {}", self.display_name, event.kind),
            body,
        }
    }
}

/// `1.37x`, or the placeholder when the ratio is undefined.
pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) if r.is_finite() => format!("{r:.2}x"),
        _ => NOT_AVAILABLE.to_string(),
    }
}
