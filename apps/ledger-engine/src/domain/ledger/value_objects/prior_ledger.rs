//! Read-only view of yesterday's finalized ledger.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::domain::shared::Symbol;

use super::LedgerRow;

/// Yesterday's ledger rows grouped by ticker.
///
/// Purely a basis source: the reconciliation pass reads it and never writes
/// back. A ticker normally has one row; two can appear after a rollover day,
/// in which case price lookups take the maximum over the candidates.
#[derive(Debug, Clone, Default)]
pub struct PriorLedger {
    rows: BTreeMap<Symbol, Vec<LedgerRow>>,
}

impl PriorLedger {
    /// Group a persisted row set by ticker.
    #[must_use]
    pub fn new(rows: Vec<LedgerRow>) -> Self {
        let mut grouped: BTreeMap<Symbol, Vec<LedgerRow>> = BTreeMap::new();
        for row in rows {
            grouped.entry(row.ticker.clone()).or_default().push(row);
        }
        Self { rows: grouped }
    }

    /// An empty prior ledger (first run, or nothing persisted yet).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// All rows for a ticker.
    #[must_use]
    pub fn rows_for(&self, symbol: &Symbol) -> &[LedgerRow] {
        self.rows.get(symbol).map_or(&[], Vec::as_slice)
    }

    /// Number of rows recorded for a ticker.
    #[must_use]
    pub fn count_for(&self, symbol: &Symbol) -> usize {
        self.rows_for(symbol).len()
    }

    /// The ticker's row, when exactly one exists.
    #[must_use]
    pub fn single_row(&self, symbol: &Symbol) -> Option<&LedgerRow> {
        match self.rows_for(symbol) {
            [row] => Some(row),
            _ => None,
        }
    }

    /// Maximum trade price across the ticker's rows.
    #[must_use]
    pub fn max_trade_price(&self, symbol: &Symbol) -> Option<Decimal> {
        max_of(self.rows_for(symbol), |row| row.trade_price)
    }

    /// Maximum leg price across the ticker's rows.
    #[must_use]
    pub fn max_leg_price(&self, symbol: &Symbol) -> Option<Decimal> {
        max_of(self.rows_for(symbol), |row| row.leg_price)
    }

    /// Maximum option trade price across the ticker's rows.
    #[must_use]
    pub fn max_option_trade_price(&self, symbol: &Symbol) -> Option<Decimal> {
        max_of(self.rows_for(symbol), |row| row.option_trade_price)
    }

    /// Underlying size of the ticker's first row.
    #[must_use]
    pub fn first_underlying_size(&self, symbol: &Symbol) -> Option<Decimal> {
        self.rows_for(symbol).first().and_then(|row| row.underlying_size)
    }
}

fn max_of(rows: &[LedgerRow], field: impl Fn(&LedgerRow) -> Option<Decimal>) -> Option<Decimal> {
    rows.iter().filter_map(field).max()
}
