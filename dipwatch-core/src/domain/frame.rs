//! A bar plus its derived indicator values.

use super::Bar;

/// A bar augmented with derived indicator fields.
///
/// Every derived field is `None` until enough history exists to fill its
/// window. No value is ever produced from a partial window.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub bar: Bar,
    pub band_mid: Option<f64>,
    pub band_lower: Option<f64>,
    pub band_upper: Option<f64>,
    pub rsi: Option<f64>,
    pub close_prev: Option<f64>,
    pub volume_ratio: Option<f64>,
}

impl IndicatorFrame {
    pub fn close(&self) -> f64 {
        self.bar.close
    }

    /// True when the close sits strictly below a defined lower band.
    pub fn closed_below_lower_band(&self) -> Option<bool> {
        self.band_lower.map(|lower| self.bar.close < lower)
    }
}
