//! Push notification transports.
//!
//! Each transport implements `dipwatch_core::alert::Notifier`. Credentials
//! come from the environment and are held as `SecretString`.
//!
//! [`build_notifier`] never fails: a transport whose credentials are missing
//! is replaced by [`UnconfiguredNotifier`], whose every send fails. The run
//! still logs its events and records the failed delivery.

pub mod log;
pub mod onesignal;
pub mod pushover;

use std::time::Duration;

use dipwatch_core::alert::{Alert, Notifier, NotifyError};
use secrecy::SecretString;
use tracing::error;

use crate::config::Transport;

pub use self::log::LogNotifier;
pub use onesignal::OneSignalNotifier;
pub use pushover::PushoverNotifier;

/// Read a required credential from the environment.
pub(crate) fn env_secret(name: &str) -> Result<SecretString, NotifyError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value)),
        _ => Err(NotifyError::MissingCredential(name.to_string())),
    }
}

pub(crate) fn http_client() -> Result<reqwest::blocking::Client, NotifyError> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .map_err(|e| NotifyError::Transport(format!("failed to build HTTP client: {e}")))
}

/// Map a push service response onto success or `Rejected`.
pub(crate) fn check_response(resp: reqwest::blocking::Response) -> Result<(), NotifyError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.text().unwrap_or_default();
    Err(NotifyError::Rejected {
        status: status.as_u16(),
        body,
    })
}

/// Construct the notifier for `transport`.
pub fn build_notifier(transport: Transport) -> Box<dyn Notifier> {
    let built: Result<Box<dyn Notifier>, NotifyError> = match transport {
        Transport::Pushover => {
            PushoverNotifier::from_env().map(|n| Box::new(n) as Box<dyn Notifier>)
        }
        Transport::OneSignal => {
            OneSignalNotifier::from_env().map(|n| Box::new(n) as Box<dyn Notifier>)
        }
        Transport::Log => Ok(Box::new(LogNotifier)),
    };

    built.unwrap_or_else(|err| {
        error!(?transport, error = %err, "notifier unavailable, alerts will not be delivered");
        Box::new(UnconfiguredNotifier {
            reason: err.to_string(),
        })
    })
}

/// Stands in for a transport that could not be constructed.
#[derive(Debug, Clone)]
pub struct UnconfiguredNotifier {
    reason: String,
}

impl Notifier for UnconfiguredNotifier {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn send(&self, _alert: &Alert) -> Result<(), NotifyError> {
        Err(NotifyError::Transport(self.reason.clone()))
    }
}
