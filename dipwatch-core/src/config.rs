//! Alert configuration.
//!
//! One value holding every tunable of the detection engine. It is built once
//! (from defaults or a settings file) and handed to each component at
//! construction; nothing reads ambient global state.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be at least {min}, got {value}")]
    WindowTooSmall {
        field: &'static str,
        min: usize,
        value: usize,
    },

    #[error("{field} must be finite and non-negative, got {value}")]
    InvalidNumber { field: &'static str, value: f64 },
}

/// Tunables of the dip/reversal detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlertConfig {
    /// Provider ticker (Yahoo Finance notation).
    pub symbol: String,
    /// Candle interval requested from the provider, e.g. `1h`.
    pub interval: String,
    /// History span requested from the provider, e.g. `60d`.
    pub lookback: String,
    /// Bollinger window, in bars (~30 trading days of hourly candles).
    pub band_window: usize,
    pub band_std_multiplier: f64,
    pub rsi_window: usize,
    /// Bars averaged for the volume ratio, excluding the current bar.
    pub volume_avg_window: usize,
    /// Minimum hours between two notifications of the same event kind.
    pub cooldown_hours: f64,
    /// IANA timezone all bar timestamps are converted to.
    pub timezone: Tz,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            symbol: "^NSEI".into(),
            interval: "1h".into(),
            lookback: "60d".into(),
            band_window: 195,
            band_std_multiplier: 2.0,
            rsi_window: 30,
            volume_avg_window: 30,
            cooldown_hours: 4.0,
            timezone: chrono_tz::Asia::Kolkata,
        }
    }
}

impl AlertConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("symbol", &self.symbol),
            ("interval", &self.interval),
            ("lookback", &self.lookback),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty { field });
            }
        }

        // Sample stddev needs at least two observations.
        check_window("band_window", self.band_window, 2)?;
        check_window("rsi_window", self.rsi_window, 1)?;
        check_window("volume_avg_window", self.volume_avg_window, 1)?;

        check_number("band_std_multiplier", self.band_std_multiplier)?;
        check_number("cooldown_hours", self.cooldown_hours)?;
        Ok(())
    }
}

fn check_window(field: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::WindowTooSmall { field, min, value });
    }
    Ok(())
}

fn check_number(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidNumber { field, value });
    }
    Ok(())
}
