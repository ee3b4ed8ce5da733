//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses sample stddev (divide by N - 1).
//! Lookback: period - 1.

use super::mean;
use crate::domain::Bar;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

/// Rolling mean and sample stddev of close for one window position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    pub stddev: f64,
}

impl WindowStats {
    pub fn band(&self, band: BollingerBand, multiplier: f64) -> f64 {
        match band {
            BollingerBand::Middle => self.mean,
            BollingerBand::Upper => self.mean + multiplier * self.stddev,
            BollingerBand::Lower => self.mean - multiplier * self.stddev,
        }
    }
}

/// Mean and sample stddev of close over each trailing `period`-bar window.
///
/// `None` for the first `period - 1` bars. `period` must be at least 2.
pub fn window_stats(bars: &[Bar], period: usize) -> Vec<Option<WindowStats>> {
    assert!(period >= 2, "sample stddev needs a period of at least 2");
    let n = bars.len();
    let mut result = vec![None; n];

    if n < period {
        return result;
    }

    let mut window = Vec::with_capacity(period);
    for i in (period - 1)..n {
        window.clear();
        window.extend(bars[i + 1 - period..=i].iter().map(|b| b.close));

        let m = mean(&window);
        let variance = window
            .iter()
            .map(|c| {
                let diff = c - m;
                diff * diff
            })
            .sum::<f64>()
            / (period - 1) as f64;

        result[i] = Some(WindowStats {
            mean: m,
            stddev: variance.sqrt(),
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    fn band(bars: &[Bar], period: usize, band: BollingerBand, k: f64) -> Vec<Option<f64>> {
        window_stats(bars, period)
            .into_iter()
            .map(|s| s.map(|s| s.band(band, k)))
            .collect()
    }

    #[test]
    fn bollinger_middle_is_sma() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = band(&bars, 3, BollingerBand::Middle, 2.0);

        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        // SMA[2] = mean(10,11,12) = 11.0
        assert_approx(result[2].unwrap(), 11.0, DEFAULT_EPSILON);
        assert_approx(result[3].unwrap(), 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_uses_sample_stddev() {
        // closes 10,11,12: mean 11, sample var = (1+0+1)/2 = 1, stddev = 1
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        let stats = window_stats(&bars, 3)[2].unwrap();
        assert_approx(stats.stddev, 1.0, DEFAULT_EPSILON);
        assert_approx(stats.band(BollingerBand::Upper, 2.0), 13.0, DEFAULT_EPSILON);
        assert_approx(stats.band(BollingerBand::Lower, 2.0), 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_bands_symmetric() {
        let bars = make_bars(&[10.0, 11.5, 12.0, 13.7, 14.0]);
        let upper = band(&bars, 3, BollingerBand::Upper, 2.0);
        let middle = band(&bars, 3, BollingerBand::Middle, 2.0);
        let lower = band(&bars, 3, BollingerBand::Lower, 2.0);

        for i in 2..5 {
            let half_width = upper[i].unwrap() - middle[i].unwrap();
            assert_approx(middle[i].unwrap() - lower[i].unwrap(), half_width, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn bollinger_constant_price_zero_width() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0]);
        let stats = window_stats(&bars, 3)[3].unwrap();
        assert_approx(stats.stddev, 0.0, DEFAULT_EPSILON);
        assert_approx(stats.band(BollingerBand::Lower, 2.0), 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_short_series_all_none() {
        let bars = make_bars(&[10.0, 11.0]);
        assert!(window_stats(&bars, 3).iter().all(Option::is_none));
    }

    #[test]
    #[should_panic(expected = "period of at least 2")]
    fn bollinger_period_one_panics() {
        window_stats(&make_bars(&[10.0, 11.0]), 1);
    }
}
