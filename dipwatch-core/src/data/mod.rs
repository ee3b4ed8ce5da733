//! Data providers and bar ingestion

pub mod csv_import;
pub mod ingest;
pub mod provider;
pub mod yahoo;

pub use csv_import::CsvProvider;
pub use ingest::{ingest, Ingested};
pub use provider::{BarProvider, DataError, FetchRequest, RawBar};
pub use yahoo::YahooProvider;
