//! Ledger value objects.

mod action_label;
mod ledger_row;
mod prior_ledger;

pub use action_label::ActionLabel;
pub use ledger_row::{
    LedgerRow, RowPatch, AMBIGUOUS_BASIS, DELTA_INVALID_CONTRACT, DELTA_NO_MODEL,
};
pub use prior_ledger::PriorLedger;
