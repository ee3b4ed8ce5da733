//! Bar provider trait and structured error types.
//!
//! The BarProvider trait abstracts over data sources (Yahoo Finance, CSV
//! import) so the runner can swap implementations and mock them in tests.

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

/// Raw OHLCV bar from a provider, in whatever timezone the source reports.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    pub timestamp: DateTime<FixedOffset>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

/// What to fetch: one symbol, one candle interval, one lookback span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub symbol: String,
    pub interval: String,
    pub lookback: String,
}

impl FetchRequest {
    pub fn new(
        symbol: impl Into<String>,
        interval: impl Into<String>,
        lookback: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            lookback: lookback.into(),
        }
    }
}

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("csv import error: {0}")]
    Csv(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for bar providers.
///
/// An empty `Vec` is a valid answer (the provider had nothing for the span).
pub trait BarProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch bars for the request, oldest first.
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawBar>, DataError>;
}
