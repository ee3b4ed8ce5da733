//! Signal evaluator over the latest two indicator frames.
//!
//! - DipDetected: `last.close < last.band_lower && last.close < last.open`
//! - ReversalConfirmed: `last.close > last.band_lower && last.close > last.open
//!   && prev.close < prev.band_lower`
//!
//! Both conditions are evaluated independently; each fires at most once per
//! evaluation.

use crate::domain::event::percent_change;
use crate::domain::{EventKind, IndicatorFrame, SignalEvent};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Inputs shared by both conditions, present only once every one is defined.
struct Snapshot {
    close: f64,
    band_lower: f64,
    rsi: f64,
    close_prev: f64,
}

impl Snapshot {
    fn of(frame: &IndicatorFrame) -> Option<Self> {
        Some(Self {
            close: frame.close(),
            band_lower: frame.band_lower?,
            rsi: frame.rsi?,
            close_prev: frame.close_prev?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SignalEvaluator;

impl SignalEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Classify the latest frame. `now` stamps `logged_at` on every event.
    pub fn evaluate(&self, frames: &[IndicatorFrame], now: DateTime<Utc>) -> Vec<SignalEvent> {
        let [.., prev, last] = frames else {
            debug!(frames = frames.len(), "need two frames to evaluate");
            return Vec::new();
        };

        let Some(snap) = Snapshot::of(last) else {
            debug!(
                at = %last.bar.timestamp,
                "latest bar lacks band, RSI or previous close; skipping evaluation"
            );
            return Vec::new();
        };

        let mut fired = Vec::new();

        if snap.close < snap.band_lower && last.bar.is_red() {
            fired.push(EventKind::DipDetected);
        }

        match prev.closed_below_lower_band() {
            Some(prev_below) => {
                if snap.close > snap.band_lower && last.bar.is_green() && prev_below {
                    fired.push(EventKind::ReversalConfirmed);
                }
            }
            None => debug!(
                at = %prev.bar.timestamp,
                "previous bar has no lower band; skipping reversal check"
            ),
        }

        let logged_at = now.with_timezone(&last.bar.timestamp.timezone());
        fired
            .into_iter()
            .map(|kind| SignalEvent {
                timestamp: last.bar.timestamp,
                kind,
                close: snap.close,
                band_lower: snap.band_lower,
                rsi: snap.rsi,
                volume_ratio: last.volume_ratio,
                percent_change: percent_change(snap.close, snap.close_prev),
                logged_at,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;
    use chrono::TimeZone;

    fn frame(hour: u32, open: f64, close: f64, band_lower: Option<f64>) -> IndicatorFrame {
        IndicatorFrame {
            bar: Bar {
                timestamp: chrono_tz::Asia::Kolkata
                    .with_ymd_and_hms(2024, 6, 3, hour, 15, 0)
                    .unwrap(),
                open,
                high: open.max(close) + 10.0,
                low: open.min(close) - 10.0,
                close,
                volume: None,
            },
            band_mid: band_lower.map(|l| l + 100.0),
            band_lower,
            band_upper: band_lower.map(|l| l + 200.0),
            rsi: Some(35.0),
            close_prev: Some(open),
            volume_ratio: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 5, 0, 0).unwrap()
    }

    fn kinds(events: &[SignalEvent]) -> Vec<EventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn dip_fires_on_red_close_below_band() {
        let prev = frame(9, 17200.0, 17150.0, Some(17000.0));
        let last = frame(10, 17100.0, 17000.0, Some(17050.0));
        let events = SignalEvaluator::new().evaluate(&[prev, last], now());
        assert_eq!(kinds(&events), vec![EventKind::DipDetected]);
        assert_eq!(events[0].close, 17000.0);
        assert_eq!(events[0].band_lower, 17050.0);
    }

    #[test]
    fn green_close_below_band_is_not_a_dip() {
        let prev = frame(9, 17200.0, 17150.0, Some(17000.0));
        let last = frame(10, 16900.0, 17000.0, Some(17050.0));
        assert!(SignalEvaluator::new().evaluate(&[prev, last], now()).is_empty());
    }

    #[test]
    fn reversal_requires_prior_dip_bar() {
        let prev = frame(9, 17000.0, 16900.0, Some(16950.0));
        let last = frame(10, 17000.0, 17100.0, Some(17050.0));
        let events = SignalEvaluator::new().evaluate(&[prev, last.clone()], now());
        assert_eq!(kinds(&events), vec![EventKind::ReversalConfirmed]);

        let prev_above = frame(9, 17000.0, 16990.0, Some(16950.0));
        assert!(SignalEvaluator::new()
            .evaluate(&[prev_above, last], now())
            .is_empty());
    }

    #[test]
    fn undefined_band_skips_silently() {
        let prev = frame(9, 17000.0, 16900.0, Some(16950.0));
        let last = frame(10, 17100.0, 17000.0, None);
        assert!(SignalEvaluator::new().evaluate(&[prev, last], now()).is_empty());
    }

    #[test]
    fn undefined_prev_band_still_allows_dip() {
        let prev = frame(9, 17000.0, 16900.0, None);
        let last = frame(10, 17100.0, 17000.0, Some(17050.0));
        let events = SignalEvaluator::new().evaluate(&[prev, last], now());
        assert_eq!(kinds(&events), vec![EventKind::DipDetected]);
    }

    #[test]
    fn single_frame_is_not_enough() {
        let last = frame(10, 17100.0, 17000.0, Some(17050.0));
        assert!(SignalEvaluator::new().evaluate(&[last], now()).is_empty());
    }

    #[test]
    fn percent_change_and_logged_at_are_filled() {
        let prev = frame(9, 17200.0, 17150.0, Some(17000.0));
        let mut last = frame(10, 17100.0, 17000.0, Some(17050.0));
        last.close_prev = Some(17150.0);
        let events = SignalEvaluator::new().evaluate(&[prev, last], now());
        let expected = (17000.0 - 17150.0) / 17150.0 * 100.0;
        assert!((events[0].percent_change - expected).abs() < 1e-12);
        // 05:00Z is 10:30 IST
        assert_eq!(
            events[0].logged_at,
            chrono_tz::Asia::Kolkata
                .with_ymd_and_hms(2024, 6, 3, 10, 30, 0)
                .unwrap()
        );
    }
}
