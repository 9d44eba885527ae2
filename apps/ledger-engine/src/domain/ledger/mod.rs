//! Ledger context: the daily trade ledger and its classification rules.

/// Reconciliation services.
pub mod services;
/// Ledger value objects.
pub mod value_objects;

pub use services::{
    ActionResolver, BasisResolver, LedgerRowBuilder, StockBasis, TradeReconciler,
    TradeReconciliation,
};
pub use value_objects::{
    ActionLabel, LedgerRow, PriorLedger, RowPatch, AMBIGUOUS_BASIS, DELTA_INVALID_CONTRACT,
    DELTA_NO_MODEL,
};
