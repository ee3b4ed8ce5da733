//! Indicator implementations and the pipeline that assembles them.
//!
//! Every indicator is a pure function of the bar series: bars in, one value
//! per bar out. A value is `None` until its window is completely filled, so
//! "not enough history" is visible in the type instead of travelling as NaN.
//!
//! RSI and volume ratio implement the single-series `Indicator` trait.
//! Bollinger Bands share one set of window statistics across three bands,
//! so they are computed once through `window_stats` instead.

pub mod bollinger;
pub mod pipeline;
pub mod rsi;
pub mod volume;

pub use bollinger::{window_stats, BollingerBand, WindowStats};
pub use pipeline::IndicatorPipeline;
pub use rsi::Rsi;
pub use volume::VolumeRatio;

use crate::domain::Bar;

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No value at bar t may depend on bar t+1 or later: computing over a
/// truncated series must reproduce the prefix of the full-series output.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "rsi_30", "volume_ratio_20").
    fn name(&self) -> &str;

    /// Number of leading bars that are always `None`.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns a `Vec` of the same length as `bars`.
    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>>;
}

/// Arithmetic mean of a non-empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Create synthetic hourly bars from close prices for testing.
///
/// open = prev_close (or close for the first bar), high/low bracket the body
/// by 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    use chrono::TimeZone;
    let base = chrono_tz::Asia::Kolkata
        .with_ymd_and_hms(2024, 6, 3, 9, 15, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + chrono::Duration::hours(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: Some(1000.0),
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
