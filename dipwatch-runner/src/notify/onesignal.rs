//! OneSignal transport (`https://api.onesignal.com/notifications`).
//!
//! JSON POST targeting the push channel of every subscribed device.
//! Credentials: `ONESIGNAL_API_KEY` (sent verbatim as the `Authorization`
//! header value) and `ONESIGNAL_APP_ID`.

use dipwatch_core::alert::{Alert, Notifier, NotifyError};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::debug;

use super::{check_response, env_secret, http_client};

const ONESIGNAL_URL: &str = "https://api.onesignal.com/notifications";
const DEFAULT_SEGMENT: &str = "Total Subscriptions";

pub struct OneSignalNotifier {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: SecretString,
    app_id: SecretString,
    segments: Vec<String>,
}

impl OneSignalNotifier {
    pub fn new(api_key: SecretString, app_id: SecretString) -> Result<Self, NotifyError> {
        Ok(Self {
            client: http_client()?,
            endpoint: ONESIGNAL_URL.to_string(),
            api_key,
            app_id,
            segments: vec![DEFAULT_SEGMENT.to_string()],
        })
    }

    pub fn from_env() -> Result<Self, NotifyError> {
        Self::new(env_secret("ONESIGNAL_API_KEY")?, env_secret("ONESIGNAL_APP_ID")?)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn payload(&self, alert: &Alert) -> Value {
        json!({
            "app_id": self.app_id.expose_secret(),
            "target_channel": "push",
            "headings": { "en": alert.title },
            "contents": { "en": alert.body },
            "included_segments": self.segments,
        })
    }
}

impl Notifier for OneSignalNotifier {
    fn name(&self) -> &str {
        "onesignal"
    }

    fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        debug!(title = %alert.title, "sending onesignal notification");
        let resp = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, self.api_key.expose_secret())
            .json(&self.payload(alert))
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        check_response(resp)
    }
}
