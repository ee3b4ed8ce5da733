//! Bar series ingestion.
//!
//! Converts provider bars into the target timezone. The input must already be
//! in chronological order; the ingestor checks that, it never re-sorts.
//! Prices must be finite and positive and volume, when present, finite and
//! non-negative. A bad value rejects the whole series: a NaN that slipped
//! through would surface as a defined but meaningless band or RSI.

use super::provider::{DataError, RawBar};
use crate::domain::Bar;
use chrono::DateTime;
use chrono_tz::Tz;

/// Outcome of ingesting one provider response.
#[derive(Debug, Clone, PartialEq)]
pub enum Ingested {
    /// The provider returned nothing; the run has nothing to evaluate.
    NoData,
    Bars(Vec<Bar>),
}

/// Convert raw bars into zoned bars, preserving order.
///
/// Fails with `DataError::Validation` when a timestamp does not strictly
/// increase over its predecessor, or when a price or volume is unusable.
pub fn ingest(raw: Vec<RawBar>, tz: Tz) -> Result<Ingested, DataError> {
    if raw.is_empty() {
        return Ok(Ingested::NoData);
    }

    let mut bars: Vec<Bar> = Vec::with_capacity(raw.len());
    for rb in raw {
        let timestamp = rb.timestamp.with_timezone(&tz);
        check_values(&rb, timestamp)?;
        if let Some(prev) = bars.last() {
            if timestamp <= prev.timestamp {
                return Err(DataError::Validation(format!(
                    "bar at {timestamp} does not follow {} (input must be strictly increasing)",
                    prev.timestamp
                )));
            }
        }
        bars.push(Bar {
            timestamp,
            open: rb.open,
            high: rb.high,
            low: rb.low,
            close: rb.close,
            volume: rb.volume,
        });
    }

    Ok(Ingested::Bars(bars))
}

fn check_values(rb: &RawBar, at: DateTime<Tz>) -> Result<(), DataError> {
    for (field, value) in [
        ("open", rb.open),
        ("high", rb.high),
        ("low", rb.low),
        ("close", rb.close),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(DataError::Validation(format!(
                "bar at {at} has unusable {field} {value}"
            )));
        }
    }
    if let Some(volume) = rb.volume {
        if !volume.is_finite() || volume < 0.0 {
            return Err(DataError::Validation(format!(
                "bar at {at} has unusable volume {volume}"
            )));
        }
    }
    Ok(())
}
