//! Run-once orchestration: fetch → ingest → indicators → evaluate → log → notify.
//!
//! One call handles one scheduled invocation. For every event the evaluator
//! fires, the cooldown decision is taken against the history logged before
//! this run, then the event is appended, then the notifier is called only
//! when the gate said Eligible. Notification failures are recorded in the
//! report; event log failures abort the run.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use dipwatch_core::alert::{AlertFormatter, Notifier};
use dipwatch_core::data::{ingest, BarProvider, DataError, FetchRequest, Ingested};
use dipwatch_core::indicators::IndicatorPipeline;
use dipwatch_core::signals::SignalEvaluator;
use dipwatch_core::{
    AlertConfig, ConfigError, CooldownGate, CooldownState, EventLog, EventLogError, SignalEvent,
};

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("event log error: {0}")]
    EventLog(#[from] EventLogError),

    /// The provider answered with bars that break the ordering contract.
    #[error("bad bar series: {0}")]
    Data(#[from] DataError),
}

/// Why a run ended without evaluating anything.
#[derive(Debug, Clone, PartialEq)]
pub enum NoDataReason {
    /// The provider returned an empty series.
    Empty,
    /// The provider failed; the message is its diagnostic.
    ProviderFailed(String),
}

/// What happened to one event's notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Sent,
    Failed(String),
    Suppressed { elapsed_hours: f64 },
}

/// One fired event, its log id and its delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct EventOutcome {
    pub id: i64,
    pub event: SignalEvent,
    pub delivery: Delivery,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub symbol: String,
    pub bar_count: usize,
    /// Timestamp of the newest bar evaluated.
    pub last_bar: DateTime<Tz>,
    pub events: Vec<EventOutcome>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    NoData(NoDataReason),
    Completed(RunReport),
}

/// Everything one run needs, passed in explicitly.
pub struct RunContext<'a> {
    pub config: &'a AlertConfig,
    pub provider: &'a dyn BarProvider,
    pub log: &'a mut dyn EventLog,
    pub notifier: &'a dyn Notifier,
    pub formatter: &'a AlertFormatter,
}

/// Execute one detection run.
///
/// `now` stamps `logged_at` on every event; pass `Utc::now()` in production.
pub fn run_once(ctx: RunContext<'_>, now: DateTime<Utc>) -> Result<RunOutcome, RunError> {
    let RunContext {
        config,
        provider,
        log,
        notifier,
        formatter,
    } = ctx;
    config.validate()?;

    let request = FetchRequest::new(&config.symbol, &config.interval, &config.lookback);
    info!(
        provider = provider.name(),
        symbol = %request.symbol,
        interval = %request.interval,
        lookback = %request.lookback,
        "fetching bars"
    );

    let raw = match provider.fetch(&request) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(symbol = %request.symbol, error = %err, "data fetch failed, treating as no data");
            return Ok(RunOutcome::NoData(NoDataReason::ProviderFailed(
                err.to_string(),
            )));
        }
    };

    let bars = match ingest(raw, config.timezone)? {
        Ingested::NoData => {
            warn!(symbol = %request.symbol, "no data returned, nothing to evaluate");
            return Ok(RunOutcome::NoData(NoDataReason::Empty));
        }
        Ingested::Bars(bars) => bars,
    };

    let pipeline = IndicatorPipeline::new(config);
    let frames = pipeline.compute(&bars);
    let events = SignalEvaluator::new().evaluate(&frames, now);

    // Ingest never returns an empty series.
    let last_bar = frames
        .last()
        .map(|f| f.bar.timestamp)
        .unwrap_or_else(|| now.with_timezone(&config.timezone));

    if events.is_empty() {
        info!(symbol = %config.symbol, bars = bars.len(), %last_bar, "no signal on latest bar");
    }

    let gate = CooldownGate::from_config(config);
    let mut outcomes = Vec::with_capacity(events.len());

    for event in events {
        // Decide before appending so the new row cannot suppress itself.
        let state = gate.check(log, event.kind, event.timestamp)?;

        let id = log.append(&event).map_err(|err| {
            error!(kind = %event.kind, error = %err, "failed to log event");
            err
        })?;
        info!(id, kind = %event.kind, close = event.close, rsi = event.rsi, "event logged");

        let delivery = match state {
            CooldownState::Suppressed { elapsed_hours } => {
                info!(
                    kind = %event.kind,
                    elapsed_hours,
                    cooldown_hours = gate.cooldown_hours(),
                    "notification suppressed by cooldown"
                );
                Delivery::Suppressed { elapsed_hours }
            }
            CooldownState::Eligible => deliver(notifier, formatter, &event),
        };

        outcomes.push(EventOutcome {
            id,
            event,
            delivery,
        });
    }

    Ok(RunOutcome::Completed(RunReport {
        symbol: config.symbol.clone(),
        bar_count: bars.len(),
        last_bar,
        events: outcomes,
    }))
}

fn deliver(notifier: &dyn Notifier, formatter: &AlertFormatter, event: &SignalEvent) -> Delivery {
    let alert = formatter.format(event);
    debug!(transport = notifier.name(), title = %alert.title, "notifying");
    match notifier.send(&alert) {
        Ok(()) => {
            info!(transport = notifier.name(), kind = %event.kind, "notification sent");
            Delivery::Sent
        }
        Err(err) => {
            warn!(transport = notifier.name(), kind = %event.kind, error = %err, "notification failed");
            Delivery::Failed(err.to_string())
        }
    }
}
