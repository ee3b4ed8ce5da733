//! Volume ratio: current volume over the trailing average volume.
//!
//! The average covers the `period` bars immediately before bar i, excluding
//! bar i itself. Bars without reported volume are skipped inside the window;
//! the ratio is `None` when the window is not yet full, holds no volume at
//! all, averages to zero, or bar i has no volume.
//! Lookback: period.

use super::{mean, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct VolumeRatio {
    period: usize,
    name: String,
}

impl VolumeRatio {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "volume period must be >= 1");
        Self {
            period,
            name: format!("volume_ratio_{period}"),
        }
    }
}

impl Indicator for VolumeRatio {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let n = bars.len();
        let mut result = vec![None; n];
        let mut window = Vec::with_capacity(self.period);

        for i in self.period..n {
            let Some(current) = bars[i].volume else {
                continue;
            };

            window.clear();
            window.extend(bars[i - self.period..i].iter().filter_map(|b| b.volume));
            if window.is_empty() {
                continue;
            }

            let avg = mean(&window);
            if avg > 0.0 {
                result[i] = Some(current / avg);
            }
        }

        result
    }
}

/// True when not a single bar in the series reports volume.
pub fn volume_absent(bars: &[Bar]) -> bool {
    bars.iter().all(|b| b.volume.is_none())
}
