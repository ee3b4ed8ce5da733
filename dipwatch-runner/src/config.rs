//! Settings file for a scheduled run.
//!
//! ```toml
//! [alert]
//! symbol = "^NSEI"
//! cooldown_hours = 4.0
//!
//! [storage]
//! database = "signals.db"
//!
//! [notifier]
//! transport = "pushover"
//! display_name = "NIFTY 50"
//! ```
//!
//! Every section and key is optional. Credentials never live here; the
//! transports read them from the environment.

use std::path::{Path, PathBuf};

use dipwatch_core::AlertConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid alert config: {0}")]
    Invalid(#[from] dipwatch_core::ConfigError),
}

/// Top-level settings: the detector config plus where to store and notify.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub alert: AlertConfig,
    pub storage: StorageSettings,
    pub notifier: NotifierSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSettings {
    /// SQLite database file holding the event log.
    pub database: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database: PathBuf::from("signals.db"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotifierSettings {
    pub transport: Transport,
    /// Name shown in alert titles. Falls back to the symbol.
    pub display_name: Option<String>,
}

/// Push transport selected in the settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Pushover,
    OneSignal,
    /// Write alerts to the log instead of pushing them.
    Log,
}

impl Settings {
    /// Load and validate settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate settings from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        settings.alert.validate()?;
        Ok(settings)
    }

    pub fn display_name(&self) -> &str {
        self.notifier
            .display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.alert.symbol)
    }
}
