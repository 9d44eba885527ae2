//! Ledger Engine Binary
//!
//! Runs one recording pass over the day's fills and portfolio snapshot.
//! Scheduled daily at the close of trading; on weekends and holidays it
//! returns before touching anything.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin ledger-engine -- [--recover-trades] [--config <path>]
//! ```
//!
//! - `--recover-trades`: re-process the day's archived fill-set instead of
//!   fetching live (the live fetch wins if both are requested).
//! - `--config <path>`: YAML configuration file (default: `config.yaml`,
//!   built-in defaults when absent).
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tracing::info;

use ledger_engine::config::load_config;
use ledger_engine::telemetry::init_telemetry;
use ledger_engine::{
    HolidayFileCalendar, JsonLedgerStore, RecordDayUseCase, RecordedGateway, RunMode, RunOutcome,
    StaticDeltaLookup,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry();

    let args: Vec<String> = std::env::args().collect();
    let read_trades = args.iter().any(|arg| arg == "--read-trades");
    let recover_trades = args.iter().any(|arg| arg == "--recover-trades");
    let mode = RunMode::from_flags(read_trades, recover_trades);
    let config_path = args
        .windows(2)
        .find(|pair| pair[0] == "--config")
        .map(|pair| pair[1].clone());

    let config = load_config(config_path.as_deref()).context("loading configuration")?;
    let venue_tz = config.venue_tz().context("resolving venue time zone")?;

    let today = Utc::now().with_timezone(&venue_tz).date_naive();
    info!(
        mode = ?mode,
        date = %today,
        data_dir = %config.data_dir.display(),
        "ledger engine starting"
    );

    let store = Arc::new(JsonLedgerStore::new(&config.data_dir));
    let gateway = Arc::new(RecordedGateway::new(&config.data_dir, today));
    let delta_lookup = Arc::new(StaticDeltaLookup::new());
    let mut calendar = HolidayFileCalendar::new(config.holidays_path());
    if let Some(half_days) = &config.half_days_file {
        calendar = calendar.with_half_days(half_days);
    }

    let use_case = RecordDayUseCase::new(
        gateway,
        delta_lookup,
        Arc::new(calendar),
        store.clone(),
        store,
        venue_tz,
        config.close_hour,
    );

    match use_case.execute(mode).await.context("recording run failed")? {
        RunOutcome::NotTradingDay => {
            info!("nothing to record today");
        }
        RunOutcome::Completed(summary) => {
            info!(
                trade_rows = summary.trade_rows,
                position_rows = summary.position_rows,
                warnings = summary.warnings.len(),
                "run complete"
            );
        }
    }
    Ok(())
}
