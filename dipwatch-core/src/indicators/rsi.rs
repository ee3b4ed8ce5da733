//! Relative Strength Index (RSI).
//!
//! delta[i] = close[i] - close[i-1]; gains and losses are split from the
//! deltas and averaged with a trailing simple mean over `period` deltas.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period (the first delta exists at bar 1).
//! Edge cases: avg_loss == 0 → 100; both averages 0 → 50 (no movement).

use super::{mean, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let n = bars.len();
        let mut result = vec![None; n];

        if n < self.period + 1 {
            return result;
        }

        // gains[k] / losses[k] describe the move into bar k + 1.
        let (gains, losses): (Vec<f64>, Vec<f64>) = bars
            .windows(2)
            .map(|w| {
                let delta = w[1].close - w[0].close;
                (delta.max(0.0), (-delta).max(0.0))
            })
            .unzip();

        for i in self.period..n {
            let window = (i - self.period)..i;
            let avg_gain = mean(&gains[window.clone()]);
            let avg_loss = mean(&losses[window]);
            result[i] = Some(compute_rsi(avg_gain, avg_loss));
        }

        result
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
