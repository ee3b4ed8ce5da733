//! Pushover transport (`https://api.pushover.net/1/messages.json`).
//!
//! Form-encoded POST with the application token, the user key, a title and a
//! message. Credentials: `PUSHOVER_TOKEN`, `PUSHOVER_USER`.

use dipwatch_core::alert::{Alert, Notifier, NotifyError};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::{check_response, env_secret, http_client};

const PUSHOVER_URL: &str = "https://api.pushover.net/1/messages.json";

pub struct PushoverNotifier {
    client: reqwest::blocking::Client,
    endpoint: String,
    token: SecretString,
    user: SecretString,
}

impl PushoverNotifier {
    pub fn new(token: SecretString, user: SecretString) -> Result<Self, NotifyError> {
        Ok(Self {
            client: http_client()?,
            endpoint: PUSHOVER_URL.to_string(),
            token,
            user,
        })
    }

    pub fn from_env() -> Result<Self, NotifyError> {
        Self::new(env_secret("PUSHOVER_TOKEN")?, env_secret("PUSHOVER_USER")?)
    }

    /// Send to a different endpoint (test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn form<'a>(&'a self, alert: &'a Alert) -> [(&'static str, &'a str); 4] {
        [
            ("token", self.token.expose_secret()),
            ("user", self.user.expose_secret()),
            ("title", alert.title.as_str()),
            ("message", alert.body.as_str()),
        ]
    }
}

impl Notifier for PushoverNotifier {
    fn name(&self) -> &str {
        "pushover"
    }

    fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        debug!(title = %alert.title, "sending pushover notification");
        let resp = self
            .client
            .post(&self.endpoint)
            .form(&self.form(alert))
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        check_response(resp)
    }
}
