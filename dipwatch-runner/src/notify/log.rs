use dipwatch_core::alert::{Alert, Notifier, NotifyError};
use tracing::info;

/// Dry-run transport: writes the alert to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        info!(title = %alert.title, body = %alert.body, "alert (dry run)");
        Ok(())
    }
}
