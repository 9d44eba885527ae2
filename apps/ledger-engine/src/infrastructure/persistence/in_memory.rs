//! In-memory ledger store for testing.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::application::ports::{FillArchivePort, LedgerStoreError, LedgerStorePort};
use crate::domain::ledger::value_objects::{LedgerRow, PriorLedger};
use crate::domain::trade_capture::ExecutionReport;

/// In-memory implementation of `LedgerStorePort` and `FillArchivePort`.
///
/// Suitable for testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    seed: RwLock<Vec<LedgerRow>>,
    ledgers: RwLock<BTreeMap<NaiveDate, Vec<LedgerRow>>>,
    activity: RwLock<Vec<LedgerRow>>,
    fills: RwLock<BTreeMap<NaiveDate, Vec<ExecutionReport>>>,
}

impl InMemoryLedgerStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the prior ledger for the first run (test setup).
    pub fn set_prior(&self, rows: Vec<LedgerRow>) {
        *self.seed.write().unwrap() = rows;
    }

    /// The full activity log so far.
    #[must_use]
    pub fn activity(&self) -> Vec<LedgerRow> {
        self.activity.read().unwrap().clone()
    }

    /// The ledger saved for a date (empty if none).
    #[must_use]
    pub fn saved_ledger(&self, date: NaiveDate) -> Vec<LedgerRow> {
        self.ledgers
            .read()
            .unwrap()
            .get(&date)
            .cloned()
            .unwrap_or_default()
    }

    /// The fill-set archived for a date (empty if none).
    #[must_use]
    pub fn archived_fills(&self, date: NaiveDate) -> Vec<ExecutionReport> {
        self.fills
            .read()
            .unwrap()
            .get(&date)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl LedgerStorePort for InMemoryLedgerStore {
    async fn load_prior_ledger(
        &self,
        run_date: NaiveDate,
    ) -> Result<PriorLedger, LedgerStoreError> {
        let ledgers = self.ledgers.read().unwrap();
        let latest_before = ledgers
            .range(..run_date)
            .next_back()
            .map(|(_, rows)| rows.clone());
        let rows = latest_before.unwrap_or_else(|| self.seed.read().unwrap().clone());
        Ok(PriorLedger::new(rows))
    }

    async fn save_ledger(
        &self,
        date: NaiveDate,
        rows: &[LedgerRow],
    ) -> Result<(), LedgerStoreError> {
        self.ledgers.write().unwrap().insert(date, rows.to_vec());
        Ok(())
    }

    async fn append_activity(&self, rows: &[LedgerRow]) -> Result<(), LedgerStoreError> {
        self.activity.write().unwrap().extend_from_slice(rows);
        Ok(())
    }
}

#[async_trait]
impl FillArchivePort for InMemoryLedgerStore {
    async fn save_fills(
        &self,
        date: NaiveDate,
        reports: &[ExecutionReport],
    ) -> Result<(), LedgerStoreError> {
        self.fills.write().unwrap().insert(date, reports.to_vec());
        Ok(())
    }

    async fn load_fills(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ExecutionReport>, LedgerStoreError> {
        Ok(self.archived_fills(date))
    }
}
