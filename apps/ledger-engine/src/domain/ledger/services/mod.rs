//! Reconciliation services.

mod action_resolver;
mod basis_resolver;
mod reconciler;
mod row_builder;

pub use action_resolver::ActionResolver;
pub use basis_resolver::{BasisResolver, StockBasis};
pub use reconciler::{TradeReconciler, TradeReconciliation};
pub use row_builder::LedgerRowBuilder;
