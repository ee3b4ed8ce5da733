//! One OHLCV candle in the target timezone.

use chrono::DateTime;
use chrono_tz::Tz;

/// OHLCV bar for the watched symbol over one candle interval.
///
/// Timestamps are zoned in the configured target timezone. `volume` is `None`
/// when the provider reports no traded volume (index-level instruments).
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Tz>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl Bar {
    /// Close-to-open direction of the candle.
    pub fn is_red(&self) -> bool {
        self.close < self.open
    }

    pub fn is_green(&self) -> bool {
        self.close > self.open
    }
}
