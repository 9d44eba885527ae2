//! Record Day Use Case
//!
//! One batch reconciliation run: gate on the trading calendar, gather the
//! day's fills (live or recovered), reconcile them against the prior ledger,
//! annotate the end-of-day portfolio, then append the activity log and
//! republish the ledger.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::application::ports::{
    CalendarError, DeltaLookupPort, ExecutionGatewayPort, FillArchivePort, GatewayError,
    LedgerStoreError, LedgerStorePort, TradingCalendarPort,
};
use crate::domain::ledger::services::TradeReconciler;
use crate::domain::position_report::services::{
    AnnotationContext, DeltaTable, PortfolioAnnotator,
};
use crate::domain::position_report::PortfolioPosition;
use crate::domain::trade_capture::ExecutionReport;

/// How the run obtains today's fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Fetch today's fills from the execution gateway and archive them.
    Normal,
    /// Re-process a previously archived fill-set instead of fetching live.
    RecoverTrades,
}

impl RunMode {
    /// Resolve the invocation flags. A live fetch takes priority, so
    /// recovery only happens when it is the sole request.
    #[must_use]
    pub fn from_flags(read_trades: bool, recover_trades: bool) -> Self {
        if recover_trades && !read_trades {
            Self::RecoverTrades
        } else {
            Self::Normal
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Weekend or holiday: nothing fetched, nothing written.
    NotTradingDay,
    /// The run completed and persisted the day's ledger.
    Completed(RunSummary),
}

impl RunOutcome {
    /// Whether the run wrote a ledger.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Counters and diagnostics from a completed run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Trade rows appended to the activity log.
    pub trade_rows: usize,
    /// Position rows appended and republished as the new ledger.
    pub position_rows: usize,
    /// Diagnostics gathered across both passes.
    pub warnings: Vec<String>,
}

/// Errors that abort a run.
///
/// Reconciliation-level problems never appear here; they degrade into
/// sentinel values and labeled rows. Only boundary failures abort.
#[derive(Debug, thiserror::Error)]
pub enum RecordDayError {
    /// Ledger store I/O failed.
    #[error(transparent)]
    Store(#[from] LedgerStoreError),

    /// The execution gateway failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The trading calendar could not be consulted.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// Use case for recording one day of trading and position activity.
pub struct RecordDayUseCase<G, D, C, S, A>
where
    G: ExecutionGatewayPort,
    D: DeltaLookupPort,
    C: TradingCalendarPort,
    S: LedgerStorePort,
    A: FillArchivePort,
{
    gateway: Arc<G>,
    delta_lookup: Arc<D>,
    calendar: Arc<C>,
    store: Arc<S>,
    archive: Arc<A>,
    venue_tz: Tz,
    close_hour: u32,
}

impl<G, D, C, S, A> RecordDayUseCase<G, D, C, S, A>
where
    G: ExecutionGatewayPort,
    D: DeltaLookupPort,
    C: TradingCalendarPort,
    S: LedgerStorePort,
    A: FillArchivePort,
{
    /// Create a new RecordDayUseCase.
    pub fn new(
        gateway: Arc<G>,
        delta_lookup: Arc<D>,
        calendar: Arc<C>,
        store: Arc<S>,
        archive: Arc<A>,
        venue_tz: Tz,
        close_hour: u32,
    ) -> Self {
        Self {
            gateway,
            delta_lookup,
            calendar,
            store,
            archive,
            venue_tz,
            close_hour,
        }
    }

    /// Execute one run at the current wall-clock time.
    pub async fn execute(&self, mode: RunMode) -> Result<RunOutcome, RecordDayError> {
        self.execute_at(mode, Utc::now()).await
    }

    /// Execute one run as of the given instant.
    pub async fn execute_at(
        &self,
        mode: RunMode,
        now: DateTime<Utc>,
    ) -> Result<RunOutcome, RecordDayError> {
        let local = now.with_timezone(&self.venue_tz);
        let today = local.date_naive();
        let time_text = local.format("%H:%M").to_string();

        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun)
            || !self.calendar.is_trading_day(today).await?
        {
            info!(date = %today, "not a trading day, nothing to record");
            return Ok(RunOutcome::NotTradingDay);
        }

        let account_value = self.gateway.get_account_value().await?;

        let reports = match mode {
            RunMode::Normal => {
                let reports = self.gateway.get_fills_for_today().await?;
                if !reports.is_empty() {
                    self.archive.save_fills(today, &reports).await?;
                }
                reports
            }
            RunMode::RecoverTrades => {
                info!(date = %today, "recovering the archived fill-set");
                self.archive.load_fills(today).await?
            }
        };

        let prior = self.store.load_prior_ledger(today).await?;

        let reconciliation =
            TradeReconciler::new(self.venue_tz).reconcile(&reports, &prior, account_value);

        let snapshot = self.gateway.get_portfolio_snapshot().await?;
        let deltas = self.fetch_deltas(&snapshot).await;

        let annotation = PortfolioAnnotator::annotate(
            &snapshot,
            &reconciliation.rows,
            &prior,
            &AnnotationContext {
                date: today,
                time: time_text,
                account_value,
                after_close: local.hour() >= self.close_hour,
                deltas,
            },
        );

        // Trade rows first, then the portfolio rows, then the republish.
        self.store.append_activity(&reconciliation.rows).await?;
        self.store.append_activity(&annotation.rows).await?;
        self.store.save_ledger(today, &annotation.rows).await?;

        let mut warnings = reconciliation.warnings;
        warnings.extend(annotation.warnings);
        for warning in &warnings {
            warn!("{warning}");
        }
        info!(
            date = %today,
            trades = reconciliation.rows.len(),
            positions = annotation.rows.len(),
            "run recorded"
        );

        Ok(RunOutcome::Completed(RunSummary {
            trade_rows: reconciliation.rows.len(),
            position_rows: annotation.rows.len(),
            warnings,
        }))
    }

    /// Pre-fetch delta column values for every option leg in the snapshot.
    async fn fetch_deltas(&self, snapshot: &[PortfolioPosition]) -> DeltaTable {
        let mut deltas = DeltaTable::new();
        for position in snapshot {
            let contract = &position.contract;
            if let (Some(expiry), Some(strike)) = (contract.expiry(), contract.strike()) {
                let quote = self
                    .delta_lookup
                    .get_delta(contract.symbol(), expiry, strike)
                    .await;
                deltas.insert(
                    (contract.symbol().clone(), expiry, strike),
                    quote.column_value(),
                );
            }
        }
        deltas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::DeltaQuote;
    use crate::domain::shared::{Contract, Symbol};
    use crate::domain::trade_capture::{CommissionReport, Execution, Fill, FillSide};
    use crate::infrastructure::persistence::InMemoryLedgerStore;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct StubGateway {
        reports: Vec<ExecutionReport>,
        snapshot: Vec<PortfolioPosition>,
    }

    #[async_trait]
    impl ExecutionGatewayPort for StubGateway {
        async fn get_fills_for_today(&self) -> Result<Vec<ExecutionReport>, GatewayError> {
            Ok(self.reports.clone())
        }

        async fn get_portfolio_snapshot(&self) -> Result<Vec<PortfolioPosition>, GatewayError> {
            Ok(self.snapshot.clone())
        }

        async fn get_account_value(&self) -> Result<Decimal, GatewayError> {
            Ok(dec!(100_000))
        }
    }

    struct StubDelta;

    #[async_trait]
    impl DeltaLookupPort for StubDelta {
        async fn get_delta(
            &self,
            _symbol: &Symbol,
            _expiry: NaiveDate,
            _strike: Decimal,
        ) -> DeltaQuote {
            DeltaQuote::Model(dec!(0.40))
        }
    }

    struct StubCalendar {
        trading: bool,
    }

    #[async_trait]
    impl TradingCalendarPort for StubCalendar {
        async fn is_trading_day(&self, _date: NaiveDate) -> Result<bool, CalendarError> {
            Ok(self.trading)
        }
    }

    fn stock_fill() -> Fill {
        Fill {
            contract: Contract::stock("SPY"),
            execution: Execution {
                side: FillSide::Bot,
                shares: dec!(100),
                price: dec!(50),
                time: Utc.with_ymd_and_hms(2023, 7, 20, 14, 35, 0).unwrap(),
            },
            commission_report: CommissionReport {
                commission: dec!(1.00),
                realized_pnl: None,
            },
        }
    }

    fn use_case(
        gateway: StubGateway,
        calendar: StubCalendar,
        store: Arc<InMemoryLedgerStore>,
    ) -> RecordDayUseCase<
        StubGateway,
        StubDelta,
        StubCalendar,
        InMemoryLedgerStore,
        InMemoryLedgerStore,
    > {
        RecordDayUseCase::new(
            Arc::new(gateway),
            Arc::new(StubDelta),
            Arc::new(calendar),
            store.clone(),
            store,
            chrono_tz::America::New_York,
            16,
        )
    }

    // Thursday 2023-07-20, 15:35 New York.
    fn trading_hours() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 7, 20, 19, 35, 0).unwrap()
    }

    #[tokio::test]
    async fn weekend_run_is_a_clean_no_op() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let use_case = use_case(
            StubGateway {
                reports: vec![],
                snapshot: vec![],
            },
            StubCalendar { trading: true },
            store.clone(),
        );

        // Saturday 2023-07-22.
        let saturday = Utc.with_ymd_and_hms(2023, 7, 22, 19, 0, 0).unwrap();
        let outcome = use_case.execute_at(RunMode::Normal, saturday).await.unwrap();

        assert!(!outcome.is_completed());
        assert!(store.activity().is_empty());
    }

    #[tokio::test]
    async fn holiday_run_is_a_clean_no_op() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let use_case = use_case(
            StubGateway {
                reports: vec![],
                snapshot: vec![],
            },
            StubCalendar { trading: false },
            store.clone(),
        );

        let outcome = use_case
            .execute_at(RunMode::Normal, trading_hours())
            .await
            .unwrap();

        assert!(!outcome.is_completed());
        assert!(store.activity().is_empty());
    }

    #[tokio::test]
    async fn normal_run_archives_fills_and_persists_both_row_sets() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let report = ExecutionReport::stock("SPY", vec![stock_fill()]);
        let snapshot = vec![PortfolioPosition::new(
            Contract::stock("SPY"),
            dec!(100),
            dec!(50.50),
            dec!(5050),
            dec!(50),
        )];
        let use_case = use_case(
            StubGateway {
                reports: vec![report],
                snapshot,
            },
            StubCalendar { trading: true },
            store.clone(),
        );

        let outcome = use_case
            .execute_at(RunMode::Normal, trading_hours())
            .await
            .unwrap();

        let RunOutcome::Completed(summary) = outcome else {
            panic!("expected a completed run");
        };
        assert_eq!(summary.trade_rows, 1);
        assert_eq!(summary.position_rows, 1);

        // Trade row first, then the portfolio row.
        let activity = store.activity();
        assert_eq!(activity.len(), 2);
        assert_eq!(activity[0].action.as_str(), "BOT");
        assert_eq!(activity[1].action.as_str(), "OBSERVE");

        // Fill-set archived for recovery; ledger republished.
        let date = NaiveDate::from_ymd_opt(2023, 7, 20).unwrap();
        assert_eq!(store.archived_fills(date).len(), 1);
        assert_eq!(store.saved_ledger(date).len(), 1);
    }

    #[tokio::test]
    async fn recovery_run_reads_the_archive_instead_of_the_gateway() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let date = NaiveDate::from_ymd_opt(2023, 7, 20).unwrap();
        let report = ExecutionReport::stock("SPY", vec![stock_fill()]);
        store
            .save_fills(date, std::slice::from_ref(&report))
            .await
            .unwrap();

        // The gateway reports no fills; only the archive has them.
        let use_case = use_case(
            StubGateway {
                reports: vec![],
                snapshot: vec![],
            },
            StubCalendar { trading: true },
            store.clone(),
        );

        let outcome = use_case
            .execute_at(RunMode::RecoverTrades, trading_hours())
            .await
            .unwrap();

        let RunOutcome::Completed(summary) = outcome else {
            panic!("expected a completed run");
        };
        assert_eq!(summary.trade_rows, 1);
    }

    #[test]
    fn normal_mode_wins_the_flag_conflict() {
        assert_eq!(RunMode::from_flags(true, false), RunMode::Normal);
        assert_eq!(RunMode::from_flags(false, true), RunMode::RecoverTrades);
        // Both requested: the live fetch wins.
        assert_eq!(RunMode::from_flags(true, true), RunMode::Normal);
        assert_eq!(RunMode::from_flags(false, false), RunMode::Normal);
    }
}
