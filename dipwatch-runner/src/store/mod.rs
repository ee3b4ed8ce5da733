//! Durable event log on SQLite (diesel + embedded migrations).

pub mod connection;
pub mod schema;
pub mod sqlite;

pub use sqlite::SqliteEventLog;
