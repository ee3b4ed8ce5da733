#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use chrono_tz::Tz;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};
use diesel::QueryableByName;
use tempfile::TempDir;

use dipwatch_core::alert::{Alert, Notifier, NotifyError};
use dipwatch_core::data::{BarProvider, DataError, FetchRequest, RawBar};
use dipwatch_core::{AlertConfig, EventKind, SignalEvent};
use dipwatch_runner::SqliteEventLog;

pub const IST: Tz = chrono_tz::Asia::Kolkata;

/// Five flat bars then a sharp red drop: the last bar is a dip.
pub const DIP_CLOSES: [f64; 6] = [100.0, 100.0, 100.0, 100.0, 100.0, 90.0];

/// Small windows so a handful of bars is enough history.
pub fn config() -> AlertConfig {
    AlertConfig {
        band_window: 5,
        band_std_multiplier: 1.0,
        rsi_window: 3,
        volume_avg_window: 3,
        ..AlertConfig::default()
    }
}

/// Hourly raw bars starting 2024-06-03 03:45 UTC (09:15 IST); open = previous close.
pub fn raw_bars(closes: &[f64]) -> Vec<RawBar> {
    let base: DateTime<FixedOffset> = Utc
        .with_ymd_and_hms(2024, 6, 3, 3, 45, 0)
        .unwrap()
        .fixed_offset();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            RawBar {
                timestamp: base + Duration::hours(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: Some(1000.0),
            }
        })
        .collect()
}

/// Timestamp of the last bar produced by `raw_bars` for `n` closes.
pub fn last_bar_time(n: usize) -> DateTime<Tz> {
    IST.with_ymd_and_hms(2024, 6, 3, 9, 15, 0).unwrap() + Duration::hours(n as i64 - 1)
}

pub fn run_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap()
}

pub fn event_at(kind: EventKind, timestamp: DateTime<Tz>) -> SignalEvent {
    SignalEvent {
        timestamp,
        kind,
        close: 17000.0,
        band_lower: 17050.0,
        rsi: 28.4,
        volume_ratio: Some(1.5),
        percent_change: -0.58,
        logged_at: timestamp + Duration::minutes(5),
    }
}

// ── Providers ──

pub struct FixedProvider(pub Vec<RawBar>);

impl BarProvider for FixedProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    fn fetch(&self, _request: &FetchRequest) -> Result<Vec<RawBar>, DataError> {
        Ok(self.0.clone())
    }
}

pub struct DownProvider;

impl BarProvider for DownProvider {
    fn name(&self) -> &str {
        "down"
    }

    fn fetch(&self, _request: &FetchRequest) -> Result<Vec<RawBar>, DataError> {
        Err(DataError::NetworkUnreachable("connection refused".into()))
    }
}

// ── Notifiers ──

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Alert>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Alert> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

pub struct RejectingNotifier;

impl Notifier for RejectingNotifier {
    fn name(&self) -> &str {
        "rejecting"
    }

    fn send(&self, _alert: &Alert) -> Result<(), NotifyError> {
        Err(NotifyError::Rejected {
            status: 400,
            body: "invalid token".into(),
        })
    }
}

// ── SQLite ──

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}

#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}

pub struct TestDb {
    _dir: TempDir, // keep alive for the life of the test
    pub path: String,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let mut p = PathBuf::from(dir.path());
        p.push("signals.db");
        let path = p.to_string_lossy().to_string();
        Self { _dir: dir, path }
    }

    pub fn open(&self) -> SqliteEventLog {
        SqliteEventLog::open(&self.path, IST).expect("open event log")
    }
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal");

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}
