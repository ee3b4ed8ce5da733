mod common;

use chrono::Duration;
use diesel::connection::SimpleConnection;
use dipwatch_core::{EventKind, EventLog, EventLogError};
use dipwatch_runner::store::connection::connect_sqlite;

use common::{assert_sqlite_pragmas, event_at, last_bar_time, TestDb, IST};

#[test]
fn open_creates_schema_and_applies_pragmas() {
    let db = TestDb::new();
    let _log = db.open();

    let mut conn = connect_sqlite(&db.path).unwrap();
    assert_sqlite_pragmas(&mut conn);
}

#[test]
fn empty_log_has_no_most_recent() {
    let db = TestDb::new();
    let mut log = db.open();
    assert!(log.most_recent(EventKind::DipDetected).unwrap().is_none());
    assert!(log.recent(10).unwrap().is_empty());
}

#[test]
fn append_assigns_increasing_ids() {
    let db = TestDb::new();
    let mut log = db.open();
    let t = last_bar_time(6);

    let a = log.append(&event_at(EventKind::DipDetected, t)).unwrap();
    let b = log.append(&event_at(EventKind::ReversalConfirmed, t)).unwrap();
    let c = log.append(&event_at(EventKind::DipDetected, t + Duration::hours(1))).unwrap();
    assert_eq!((a, b, c), (1, 2, 3));
}

#[test]
fn event_round_trips_in_configured_timezone() {
    let db = TestDb::new();
    let mut log = db.open();
    let original = event_at(EventKind::DipDetected, last_bar_time(6));
    let id = log.append(&original).unwrap();

    let stored = log.most_recent(EventKind::DipDetected).unwrap().unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.event, original);
    assert_eq!(stored.event.timestamp.timezone(), IST);
}

#[test]
fn absent_volume_ratio_round_trips_as_none() {
    let db = TestDb::new();
    let mut log = db.open();
    let mut event = event_at(EventKind::ReversalConfirmed, last_bar_time(6));
    event.volume_ratio = None;
    log.append(&event).unwrap();

    let stored = log.most_recent(EventKind::ReversalConfirmed).unwrap().unwrap();
    assert_eq!(stored.event.volume_ratio, None);
}

#[test]
fn most_recent_filters_by_kind() {
    let db = TestDb::new();
    let mut log = db.open();
    let t = last_bar_time(6);
    log.append(&event_at(EventKind::DipDetected, t)).unwrap();
    log.append(&event_at(EventKind::ReversalConfirmed, t + Duration::hours(2)))
        .unwrap();

    let dip = log.most_recent(EventKind::DipDetected).unwrap().unwrap();
    assert_eq!(dip.id, 1);
    assert_eq!(dip.event.kind, EventKind::DipDetected);
}

#[test]
fn most_recent_follows_insertion_order_not_timestamp() {
    let db = TestDb::new();
    let mut log = db.open();
    let t = last_bar_time(6);
    log.append(&event_at(EventKind::DipDetected, t)).unwrap();
    // Older bar appended later, e.g. a backfill run.
    let late = log
        .append(&event_at(EventKind::DipDetected, t - Duration::hours(10)))
        .unwrap();

    let latest = log.most_recent(EventKind::DipDetected).unwrap().unwrap();
    assert_eq!(latest.id, late);
    assert_eq!(latest.event.timestamp, t - Duration::hours(10));
}

#[test]
fn recent_is_newest_first_and_limited() {
    let db = TestDb::new();
    let mut log = db.open();
    let t = last_bar_time(6);
    for h in 0..5 {
        log.append(&event_at(EventKind::DipDetected, t + Duration::hours(h)))
            .unwrap();
    }

    let ids: Vec<i64> = log.recent(3).unwrap().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![5, 4, 3]);
}

#[test]
fn history_survives_reopen() {
    let db = TestDb::new();
    let t = last_bar_time(6);
    {
        let mut log = db.open();
        log.append(&event_at(EventKind::DipDetected, t)).unwrap();
    }

    let mut log = db.open();
    let stored = log.most_recent(EventKind::DipDetected).unwrap().unwrap();
    assert_eq!(stored.event.timestamp, t);
    let next = log.append(&event_at(EventKind::DipDetected, t)).unwrap();
    assert_eq!(next, 2);
}

#[test]
fn unknown_kind_in_table_is_corrupt_row() {
    let db = TestDb::new();
    let mut log = db.open();

    let mut conn = connect_sqlite(&db.path).unwrap();
    conn.batch_execute(
        "INSERT INTO signal_events (timestamp, kind, close, band_lower, rsi, volume_ratio, percent_change, logged_at)
         VALUES ('2024-06-03T08:45:00.000Z', 'Breakout', 1.0, 2.0, 30.0, NULL, -0.5, '2024-06-03T09:00:00.000Z')",
    )
    .unwrap();

    let err = log.recent(10).unwrap_err();
    assert!(matches!(err, EventLogError::CorruptRow { id: 1, .. }));
}

#[test]
fn unopenable_database_is_open_error() {
    let err = dipwatch_runner::SqliteEventLog::open("/nonexistent-dir/for/sure/signals.db", IST)
        .err()
        .unwrap();
    assert!(matches!(err, EventLogError::Open { .. }));
}
