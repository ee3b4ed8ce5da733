//! Event log: the append-only history of fired events.
//!
//! The log is the only state shared between runs. "Most recent" always means
//! highest insertion id, not latest bar timestamp.

use crate::domain::{EventKind, SignalEvent};
use thiserror::Error;

/// Failures at the persistence boundary. These are fatal for a run.
#[derive(Debug, Error)]
pub enum EventLogError {
    #[error("cannot open event log at {location}: {reason}")]
    Open { location: String, reason: String },

    #[error("cannot migrate event log schema: {0}")]
    Migration(String),

    #[error("cannot append event: {0}")]
    Write(String),

    #[error("cannot read event log: {0}")]
    Read(String),

    #[error("corrupt event log row {id}: {reason}")]
    CorruptRow { id: i64, reason: String },
}

/// An event together with its log identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEvent {
    pub id: i64,
    pub event: SignalEvent,
}

/// Append-only event store with point queries.
pub trait EventLog {
    /// Append an event, returning its insertion id.
    fn append(&mut self, event: &SignalEvent) -> Result<i64, EventLogError>;

    /// Latest appended event of `kind`, by insertion order.
    fn most_recent(&mut self, kind: EventKind) -> Result<Option<StoredEvent>, EventLogError>;

    /// Up to `limit` events, newest first.
    fn recent(&mut self, limit: usize) -> Result<Vec<StoredEvent>, EventLogError>;
}

/// In-process event log. Ids start at 1 like an autoincrement column.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventLog {
    events: Vec<StoredEvent>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[StoredEvent] {
        &self.events
    }
}

impl EventLog for MemoryEventLog {
    fn append(&mut self, event: &SignalEvent) -> Result<i64, EventLogError> {
        let id = self.events.len() as i64 + 1;
        self.events.push(StoredEvent {
            id,
            event: event.clone(),
        });
        Ok(id)
    }

    fn most_recent(&mut self, kind: EventKind) -> Result<Option<StoredEvent>, EventLogError> {
        Ok(self
            .events
            .iter()
            .rev()
            .find(|s| s.event.kind == kind)
            .cloned())
    }

    fn recent(&mut self, limit: usize) -> Result<Vec<StoredEvent>, EventLogError> {
        Ok(self.events.iter().rev().take(limit).cloned().collect())
    }
}
