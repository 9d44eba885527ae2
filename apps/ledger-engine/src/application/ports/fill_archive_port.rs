//! Fill Archive Port (Driven Port)
//!
//! Persists each day's raw fill-set so a recovery run can re-process a day
//! whose trades were fetched but never reconciled.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::trade_capture::ExecutionReport;

use super::LedgerStoreError;

/// Port for archiving and recovering a day's raw fills.
#[async_trait]
pub trait FillArchivePort: Send + Sync {
    /// Persist the day's fill-set.
    async fn save_fills(
        &self,
        date: NaiveDate,
        reports: &[ExecutionReport],
    ) -> Result<(), LedgerStoreError>;

    /// Load a previously archived fill-set. An absent archive yields an
    /// empty set.
    async fn load_fills(&self, date: NaiveDate) -> Result<Vec<ExecutionReport>, LedgerStoreError>;
}
