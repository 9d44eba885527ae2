//! Ledger Store Port (Driven Port)
//!
//! Persistence for the position ledger and the append-only activity log.
//! The reconciliation logic never touches a particular file format; it only
//! sees this contract.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ledger::value_objects::{LedgerRow, PriorLedger};

/// Ledger store error. The only error class that is fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum LedgerStoreError {
    /// Underlying I/O failure.
    #[error("Ledger store I/O error at '{path}': {source}")]
    Io {
        /// Offending path or location.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Row (de)serialization failure.
    #[error("Ledger store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Port for the ledger store.
///
/// Single-writer, single-reader per run: the engine reads the prior ledger
/// once at the start and writes once at the end. Concurrent runs must be
/// serialized externally.
#[async_trait]
pub trait LedgerStorePort: Send + Sync {
    /// Yesterday's finalized ledger as of the given run date.
    ///
    /// An empty ledger (nothing persisted yet) is not an error.
    async fn load_prior_ledger(&self, run_date: NaiveDate) -> Result<PriorLedger, LedgerStoreError>;

    /// Republish the day's position rows as the ledger for `date`,
    /// superseding the prior ledger for the next run.
    async fn save_ledger(&self, date: NaiveDate, rows: &[LedgerRow]) -> Result<(), LedgerStoreError>;

    /// Append rows to the ever-growing activity log. Rows are never
    /// rewritten.
    async fn append_activity(&self, rows: &[LedgerRow]) -> Result<(), LedgerStoreError>;
}
