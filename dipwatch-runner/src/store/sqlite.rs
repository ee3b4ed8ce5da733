//! SQLite-backed event log.
//!
//! One table, `signal_events`, keyed by an autoincrement id. Timestamps are
//! written as RFC 3339 UTC strings with millisecond precision and converted
//! back to the configured timezone when read.

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use diesel::prelude::*;
use diesel::SqliteConnection;
use dipwatch_core::{EventKind, EventLog, EventLogError, SignalEvent, StoredEvent};
use tracing::debug;

use super::connection::{connect_sqlite, run_migrations};
use super::schema::signal_events;

#[derive(Insertable, Debug)]
#[diesel(table_name = signal_events)]
struct NewEventRow<'a> {
    timestamp: String, // RFC3339 UTC
    kind: &'a str,
    close: f64,
    band_lower: f64,
    rsi: f64,
    volume_ratio: Option<f64>,
    percent_change: f64,
    logged_at: String, // RFC3339 UTC
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = signal_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct EventRow {
    id: i32,
    timestamp: String,
    kind: String,
    close: f64,
    band_lower: f64,
    rsi: f64,
    volume_ratio: Option<f64>,
    percent_change: f64,
    logged_at: String,
}

impl EventRow {
    fn into_stored(self, tz: Tz) -> Result<StoredEvent, EventLogError> {
        let id = i64::from(self.id);
        let corrupt = |reason: String| EventLogError::CorruptRow { id, reason };

        let kind: EventKind = self.kind.parse().map_err(|e| corrupt(format!("{e}")))?;
        let timestamp = parse_ts(&self.timestamp, tz).map_err(corrupt)?;
        let logged_at = parse_ts(&self.logged_at, tz).map_err(corrupt)?;

        Ok(StoredEvent {
            id,
            event: SignalEvent {
                timestamp,
                kind,
                close: self.close,
                band_lower: self.band_lower,
                rsi: self.rsi,
                volume_ratio: self.volume_ratio,
                percent_change: self.percent_change,
                logged_at,
            },
        })
    }
}

/// Format a zoned datetime as an RFC-3339 UTC string with millisecond precision.
fn to_rfc3339_millis(dt: DateTime<Tz>) -> String {
    dt.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_ts(s: &str, tz: Tz) -> Result<DateTime<Tz>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&tz))
        .map_err(|e| format!("bad rfc3339 {s:?}: {e}"))
}

/// Event log persisted in a SQLite file.
pub struct SqliteEventLog {
    conn: SqliteConnection,
    tz: Tz,
}

impl SqliteEventLog {
    /// Open (creating if needed) the database and apply the schema.
    pub fn open(database_url: &str, tz: Tz) -> Result<Self, EventLogError> {
        let mut conn = connect_sqlite(database_url)?;
        run_migrations(&mut conn)?;
        debug!(database = database_url, "event log ready");
        Ok(Self { conn, tz })
    }
}

impl EventLog for SqliteEventLog {
    fn append(&mut self, event: &SignalEvent) -> Result<i64, EventLogError> {
        let row = NewEventRow {
            timestamp: to_rfc3339_millis(event.timestamp),
            kind: event.kind.label(),
            close: event.close,
            band_lower: event.band_lower,
            rsi: event.rsi,
            volume_ratio: event.volume_ratio,
            percent_change: event.percent_change,
            logged_at: to_rfc3339_millis(event.logged_at),
        };

        let id: i32 = diesel::insert_into(signal_events::table)
            .values(&row)
            .returning(signal_events::id)
            .get_result(&mut self.conn)
            .map_err(|e| EventLogError::Write(e.to_string()))?;

        Ok(i64::from(id))
    }

    fn most_recent(&mut self, kind: EventKind) -> Result<Option<StoredEvent>, EventLogError> {
        use signal_events::dsl;

        let row = dsl::signal_events
            .filter(dsl::kind.eq(kind.label()))
            .order(dsl::id.desc())
            .select(EventRow::as_select())
            .first(&mut self.conn)
            .optional()
            .map_err(|e| EventLogError::Read(e.to_string()))?;

        row.map(|r| r.into_stored(self.tz)).transpose()
    }

    fn recent(&mut self, limit: usize) -> Result<Vec<StoredEvent>, EventLogError> {
        use signal_events::dsl;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        dsl::signal_events
            .order(dsl::id.desc())
            .limit(limit)
            .select(EventRow::as_select())
            .load(&mut self.conn)
            .map_err(|e| EventLogError::Read(e.to_string()))?
            .into_iter()
            .map(|r| r.into_stored(self.tz))
            .collect()
    }
}
