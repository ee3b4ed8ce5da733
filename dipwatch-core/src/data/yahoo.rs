//! Yahoo Finance data provider.
//!
//! Fetches intraday OHLCV bars from Yahoo's v8 chart API using the
//! `range` + `interval` form of the query. Handles rate limiting, retries
//! with exponential backoff, and response parsing.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes. The CSV import path is the fallback when Yahoo is unavailable.

use super::provider::{BarProvider, DataError, FetchRequest, RawBar};
use chrono::DateTime;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const CHART_BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Longest `Retry-After` wait honoured before a retry.
const MAX_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url(CHART_BASE_URL)
    }

    /// Point the provider at a different chart endpoint (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    /// Build the chart API URL for a request.
    fn chart_url(&self, request: &FetchRequest) -> String {
        format!(
            "{}/{}?range={}&interval={}&includePrePost=false",
            self.base_url.trim_end_matches('/'),
            encode_symbol(&request.symbol),
            request.lookback,
            request.interval
        )
    }

    /// Parse the chart API response into RawBars.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<RawBar>, DataError> {
        let result = match resp.chart.result {
            Some(result) => result,
            None => {
                return Err(match resp.chart.error {
                    Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    },
                    Some(err) => DataError::ResponseFormatChanged(format!(
                        "{}: {}",
                        err.code, err.description
                    )),
                    None => DataError::ResponseFormatChanged("empty result with no error".into()),
                })
            }
        };

        let Some(data) = result.into_iter().next() else {
            return Ok(Vec::new());
        };

        // A symbol with no trades in the range comes back without timestamps.
        let Some(timestamps) = data.timestamp else {
            return Ok(Vec::new());
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let timestamp = DateTime::from_timestamp(ts, 0)
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?
                .fixed_offset();

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            match (open, high, low, close) {
                (Some(open), Some(high), Some(low), Some(close)) => bars.push(RawBar {
                    timestamp,
                    open,
                    high,
                    low,
                    close,
                    volume,
                }),
                _ => debug!(%timestamp, "skipping bar with missing prices"),
            }
        }

        Ok(bars)
    }

    /// One HTTP round trip, classified as final or worth retrying.
    fn attempt(&self, url: &str, symbol: &str) -> Attempt {
        let resp = match self.client.get(url).send() {
            Ok(resp) => resp,
            Err(e) if e.is_connect() || e.is_timeout() => {
                return Attempt::Retry(DataError::NetworkUnreachable(e.to_string()))
            }
            Err(e) => return Attempt::Done(Err(DataError::NetworkUnreachable(e.to_string()))),
        };

        match resp.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = retry_after_secs(resp.headers());
                warn!(symbol, retry_after_secs, "rate limited by Yahoo");
                Attempt::Retry(DataError::RateLimited { retry_after_secs })
            }
            StatusCode::NOT_FOUND => Attempt::Done(Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })),
            status if status.is_server_error() => {
                Attempt::Retry(DataError::Other(format!("HTTP {status} for {symbol}")))
            }
            status if !status.is_success() => {
                Attempt::Done(Err(DataError::Other(format!("HTTP {status} for {symbol}"))))
            }
            _ => Attempt::Done(
                resp.json::<ChartResponse>()
                    .map_err(|e| {
                        DataError::ResponseFormatChanged(format!(
                            "unreadable chart response for {symbol}: {e}"
                        ))
                    })
                    .and_then(|chart| Self::parse_response(symbol, chart)),
            ),
        }
    }

    fn fetch_with_retry(&self, request: &FetchRequest) -> Result<Vec<RawBar>, DataError> {
        let url = self.chart_url(request);
        let mut last_error = DataError::Other("max retries exceeded".into());

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.retry_delay(attempt, &last_error);
                debug!(attempt, ?delay, "retrying chart request");
                std::thread::sleep(delay);
            }

            match self.attempt(&url, &request.symbol) {
                Attempt::Done(result) => return result,
                Attempt::Retry(err) => {
                    debug!(attempt, error = %err, "transient chart error");
                    last_error = err;
                }
            }
        }

        Err(last_error)
    }

    /// Wait before retry number `attempt` (1-based).
    ///
    /// Exponential backoff from `base_delay`, stretched to the server's
    /// `Retry-After` hint after a 429, capped at [`MAX_RATE_LIMIT_WAIT`].
    fn retry_delay(&self, attempt: u32, last_error: &DataError) -> Duration {
        let backoff = self.base_delay * 2u32.pow(attempt.saturating_sub(1));
        match last_error {
            DataError::RateLimited { retry_after_secs } => {
                backoff.max(Duration::from_secs(*retry_after_secs).min(MAX_RATE_LIMIT_WAIT))
            }
            _ => backoff,
        }
    }
}

enum Attempt {
    Done(Result<Vec<RawBar>, DataError>),
    Retry(DataError),
}

/// Seconds from a `Retry-After` header, 60 when absent or not an integer.
fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(60)
}

impl BarProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawBar>, DataError> {
        self.fetch_with_retry(request)
    }
}

/// Percent-encode the characters Yahoo index tickers use (`^NSEI`, `^GSPC`).
fn encode_symbol(symbol: &str) -> String {
    symbol.replace('^', "%5E").replace('=', "%3D")
}
