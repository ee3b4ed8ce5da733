//! Cooldown gate — rate limits notifications per event kind.
//!
//! The gate has no state of its own. Each check asks the event log for the
//! latest event of the kind and compares its bar timestamp with the
//! candidate's: fewer than `cooldown_hours` elapsed means Suppressed.
//! Exactly `cooldown_hours` elapsed is Eligible.

use crate::config::AlertConfig;
use crate::domain::EventKind;
use crate::store::{EventLog, EventLogError, StoredEvent};
use chrono::DateTime;
use chrono_tz::Tz;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CooldownState {
    Eligible,
    Suppressed {
        /// Hours since the previous event of the same kind.
        elapsed_hours: f64,
    },
}

impl CooldownState {
    pub fn is_eligible(&self) -> bool {
        matches!(self, CooldownState::Eligible)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CooldownGate {
    cooldown_hours: f64,
}

impl CooldownGate {
    pub fn new(cooldown_hours: f64) -> Self {
        Self { cooldown_hours }
    }

    pub fn from_config(config: &AlertConfig) -> Self {
        Self::new(config.cooldown_hours)
    }

    pub fn cooldown_hours(&self) -> f64 {
        self.cooldown_hours
    }

    /// Decide whether a `kind` event on the bar at `at` may notify.
    pub fn check(
        &self,
        log: &mut dyn EventLog,
        kind: EventKind,
        at: DateTime<Tz>,
    ) -> Result<CooldownState, EventLogError> {
        let last = log.most_recent(kind)?;
        Ok(self.state_after(last.as_ref(), at))
    }

    /// Decision given the latest prior event of the kind, if any.
    pub fn state_after(&self, last: Option<&StoredEvent>, at: DateTime<Tz>) -> CooldownState {
        let Some(last) = last else {
            return CooldownState::Eligible;
        };
        let elapsed_hours = (at - last.event.timestamp).num_seconds() as f64 / 3600.0;
        if elapsed_hours < self.cooldown_hours {
            CooldownState::Suppressed { elapsed_hours }
        } else {
            CooldownState::Eligible
        }
    }
}
