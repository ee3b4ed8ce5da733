//! Indicator pipeline — bars in, one indicator frame per bar out.
//!
//! The whole frame is recomputed from the bounded history window on every
//! run; no rolling state survives between runs. Output is a pure function of
//! the bars and the configuration.

use super::bollinger::{window_stats, BollingerBand};
use super::volume::volume_absent;
use super::{Indicator, Rsi, VolumeRatio};
use crate::config::AlertConfig;
use crate::domain::{Bar, IndicatorFrame};
use tracing::{debug, warn};

/// Computes Bollinger Bands, RSI, previous close and volume ratio.
#[derive(Debug, Clone)]
pub struct IndicatorPipeline {
    band_window: usize,
    band_std_multiplier: f64,
    rsi: Rsi,
    volume_ratio: VolumeRatio,
}

impl IndicatorPipeline {
    pub fn new(config: &AlertConfig) -> Self {
        Self {
            band_window: config.band_window,
            band_std_multiplier: config.band_std_multiplier,
            rsi: Rsi::new(config.rsi_window),
            volume_ratio: VolumeRatio::new(config.volume_avg_window),
        }
    }

    /// Leading bars whose frames have at least one undefined field.
    ///
    /// The newest frame is fully defined only when the series is longer than
    /// this.
    pub fn warmup_bars(&self) -> usize {
        (self.band_window - 1)
            .max(self.rsi.lookback())
            .max(self.volume_ratio.lookback())
    }

    pub fn compute(&self, bars: &[Bar]) -> Vec<IndicatorFrame> {
        let warmup = self.warmup_bars();
        if !bars.is_empty() && bars.len() <= warmup {
            debug!(
                bars = bars.len(),
                warmup,
                band_window = self.band_window,
                "not enough history; latest frame has undefined indicators"
            );
        }
        if volume_absent(bars) {
            warn!("volume data missing for the whole series; volume ratio unavailable");
        }

        let stats = window_stats(bars, self.band_window);
        let rsi = self.rsi.compute(bars);
        let volume_ratio = self.volume_ratio.compute(bars);
        let k = self.band_std_multiplier;

        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                let s = stats[i];
                IndicatorFrame {
                    bar: bar.clone(),
                    band_mid: s.map(|s| s.band(BollingerBand::Middle, k)),
                    band_lower: s.map(|s| s.band(BollingerBand::Lower, k)),
                    band_upper: s.map(|s| s.band(BollingerBand::Upper, k)),
                    rsi: rsi[i],
                    close_prev: i.checked_sub(1).map(|p| bars[p].close),
                    volume_ratio: volume_ratio[i],
                }
            })
            .collect()
    }
}
