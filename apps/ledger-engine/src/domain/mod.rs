//! Domain layer - business logic with no infrastructure dependencies.

/// Ledger context: trade rows, basis and action resolution.
pub mod ledger;
/// Position report context: end-of-day annotation.
pub mod position_report;
/// Shared value objects.
pub mod shared;
/// Trade capture context: raw fills and combos.
pub mod trade_capture;
