//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise `--log-level` applies to everything.
//! HTTP and database crates are capped at `warn` either way. Logs go to
//! stderr so stdout carries only the run summary.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

const QUIET_CRATES: [&str; 4] = ["hyper=warn", "hyper_util=warn", "reqwest=warn", "diesel=warn"];

pub fn setup_logging(log_level: &str, json: bool) -> Result<()> {
    let mut filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)
            .map_err(|e| anyhow!("invalid log level {log_level:?}: {e}"))?,
    };
    for directive in QUIET_CRATES {
        filter = filter.add_directive(directive.parse()?);
    }

    let builder = tracing_subscriber::fmt()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;

    tracing::debug!(log_level, json, "logging initialized");
    Ok(())
}
