//! CSV bar import.
//!
//! Reads bars from a CSV file with the header
//! `timestamp,open,high,low,close,volume`. Timestamps are RFC 3339 with an
//! explicit offset; an empty volume cell means "no volume reported".
//! Rows are returned in file order.

use super::provider::{BarProvider, DataError, FetchRequest, RawBar};
use chrono::DateTime;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: Option<f64>,
}

/// Provider backed by a local CSV file. The request's symbol, interval and
/// lookback are ignored: the file is the whole answer.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BarProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch(&self, _request: &FetchRequest) -> Result<Vec<RawBar>, DataError> {
        let file = std::fs::File::open(&self.path)
            .map_err(|e| DataError::Csv(format!("open {}: {e}", self.path.display())))?;
        read_bars(file)
    }
}

/// Parse CSV bars from any reader.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<RawBar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for (line, record) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = record.map_err(|e| DataError::Csv(format!("row {}: {e}", line + 1)))?;
        let timestamp = DateTime::parse_from_rfc3339(&row.timestamp).map_err(|e| {
            DataError::Csv(format!("row {}: bad timestamp {:?}: {e}", line + 1, row.timestamp))
        })?;
        bars.push(RawBar {
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }
    Ok(bars)
}
