//! SQLite connection and migration helpers.
//!
//! [`connect_sqlite`] opens a connection and applies connection-wide PRAGMAs:
//! WAL journaling and a 5000ms busy_timeout so an overlapping scheduled run
//! waits for the lock instead of failing immediately.
//! [`run_migrations`] applies the embedded schema; it is idempotent.

use diesel::connection::SimpleConnection;
use diesel::{Connection, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use dipwatch_core::EventLogError;

/// Embedded Diesel migrations bundled with this crate.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Open a SQLite connection and apply connection-wide PRAGMAs.
pub fn connect_sqlite(database_url: &str) -> Result<SqliteConnection, EventLogError> {
    let open_err = |reason: String| EventLogError::Open {
        location: database_url.to_string(),
        reason,
    };

    let mut conn = SqliteConnection::establish(database_url).map_err(|e| open_err(e.to_string()))?;
    conn.batch_execute("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")
        .map_err(|e| open_err(e.to_string()))?;
    Ok(conn)
}

/// Bring the schema up to date.
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<(), EventLogError> {
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| EventLogError::Migration(e.to_string()))?;
    Ok(())
}
