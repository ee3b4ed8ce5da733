//! Dipwatch CLI — one detection run per invocation.
//!
//! Intended for a scheduler (cron, systemd timer) firing once per candle:
//! fetch bars, evaluate the latest one, log any event, push an alert unless
//! the cooldown suppresses it, exit. `--history` prints the event log instead.

mod logging;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{error, info};

use dipwatch_core::alert::{format_ratio, AlertFormatter, Notifier};
use dipwatch_core::data::{BarProvider, CsvProvider, YahooProvider};
use dipwatch_core::EventLog;
use dipwatch_runner::{
    build_notifier, run_once, Delivery, LogNotifier, RunContext, RunOutcome, RunReport, Settings,
    SqliteEventLog,
};

#[derive(Parser)]
#[command(
    name = "dipwatch",
    version,
    about = "Dipwatch — Bollinger/RSI dip and reversal alerts"
)]
struct Cli {
    /// Path to a TOML settings file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// SQLite event log path (overrides `[storage] database`).
    #[arg(long)]
    database: Option<PathBuf>,

    /// Read bars from a CSV file instead of Yahoo Finance.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write alerts to the log instead of pushing them.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Print the latest N logged events and exit.
    #[arg(long, value_name = "N")]
    history: Option<usize>,

    /// Log level when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(&cli.log_level, cli.json_logs)?;

    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    if let Some(db) = &cli.database {
        settings.storage.database = db.clone();
    }

    let mut log = open_event_log(&settings.storage.database, &settings)?;

    if let Some(limit) = cli.history {
        return print_history(&mut log, limit);
    }

    let provider: Box<dyn BarProvider> = match &cli.csv {
        Some(path) => Box::new(CsvProvider::new(path)),
        None => Box::new(YahooProvider::new()?),
    };
    let notifier: Box<dyn Notifier> = if cli.dry_run {
        Box::new(LogNotifier)
    } else {
        build_notifier(settings.notifier.transport)
    };
    let formatter = AlertFormatter::new(settings.display_name(), &settings.alert);

    let outcome = run_once(
        RunContext {
            config: &settings.alert,
            provider: provider.as_ref(),
            log: &mut log,
            notifier: notifier.as_ref(),
            formatter: &formatter,
        },
        Utc::now(),
    )
    .map_err(|e| {
        error!(error = %e, "run aborted");
        e
    })?;

    match outcome {
        RunOutcome::NoData(reason) => {
            info!(?reason, "run finished without data");
            println!("{}: no data", settings.alert.symbol);
        }
        RunOutcome::Completed(report) => print_report(&report),
    }
    Ok(())
}

fn open_event_log(path: &Path, settings: &Settings) -> Result<SqliteEventLog> {
    let url = path.to_string_lossy();
    SqliteEventLog::open(&url, settings.alert.timezone)
        .with_context(|| format!("opening event log {}", path.display()))
}

fn print_report(report: &RunReport) {
    println!(
        "{}: {} bars, latest {}",
        report.symbol,
        report.bar_count,
        report.last_bar.format("%Y-%m-%d %H:%M %Z")
    );
    if report.events.is_empty() {
        println!("  no signal");
    }
    for outcome in &report.events {
        let delivery = match &outcome.delivery {
            Delivery::Sent => "notified".to_string(),
            Delivery::Failed(reason) => format!("notification failed: {reason}"),
            Delivery::Suppressed { elapsed_hours } => {
                format!("suppressed ({elapsed_hours:.1}h since last)")
            }
        };
        println!(
            "  #{} {} close {:.2} rsi {:.1}: {}",
            outcome.id, outcome.event.kind, outcome.event.close, outcome.event.rsi, delivery
        );
    }
}

fn print_history(log: &mut SqliteEventLog, limit: usize) -> Result<()> {
    let events = log.recent(limit)?;
    if events.is_empty() {
        println!("event log is empty");
        return Ok(());
    }

    println!(
        "{:>5}  {:<20}  {:<18}  {:>10}  {:>10}  {:>6}  {:>8}  {:>8}",
        "id", "bar", "kind", "close", "lower", "rsi", "chg%", "vol/avg"
    );
    for stored in events {
        let e = &stored.event;
        println!(
            "{:>5}  {:<20}  {:<18}  {:>10.2}  {:>10.2}  {:>6.1}  {:>+8.2}  {:>8}",
            stored.id,
            e.timestamp.format("%Y-%m-%d %H:%M %Z").to_string(),
            e.kind.label(),
            e.close,
            e.band_lower,
            e.rsi,
            e.percent_change,
            format_ratio(e.volume_ratio),
        );
    }
    Ok(())
}
