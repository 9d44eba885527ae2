//! Accumulation of trade legs into merged ledger rows.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::ledger::value_objects::{ActionLabel, LedgerRow, RowPatch};
use crate::domain::shared::RowKey;

/// Accumulates [`RowPatch`]es into one [`LedgerRow`] per row key.
///
/// Keys are the plain ticker, plus the synthetic rollover-write key when a
/// rollover's sell leg posts. Merge semantics live on [`LedgerRow::merge`];
/// the builder guarantees a row exists before a patch lands and keeps the
/// output order deterministic (tickers sorted, write-leg row after its
/// primary).
#[derive(Debug, Default)]
pub struct LedgerRowBuilder {
    rows: BTreeMap<RowKey, LedgerRow>,
}

impl LedgerRowBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The row accumulated so far under a key, if any leg has posted.
    #[must_use]
    pub fn row(&self, key: &RowKey) -> Option<&LedgerRow> {
        self.rows.get(key)
    }

    /// Number of rows started.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no leg has posted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Merge a leg's patch into the key's row, creating the row on first
    /// contact. The `ticker` column always carries the plain symbol.
    pub fn apply(&mut self, key: RowKey, patch: RowPatch) {
        let row = self.rows.entry(key.clone()).or_insert_with(|| {
            LedgerRow::new(
                key.symbol().clone(),
                patch.date.unwrap_or_else(|| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()),
                patch.time.clone().unwrap_or_default(),
                ActionLabel::unknown(),
            )
        });
        row.merge(patch);
    }

    /// Finalized rows in deterministic key order.
    #[must_use]
    pub fn into_rows(self) -> Vec<LedgerRow> {
        self.rows.into_values().collect()
    }
}
