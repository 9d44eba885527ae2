//! Ports (driven interfaces) for external collaborators.
//!
//! The engine only ever consumes post-trade data; it never submits orders.

mod delta_lookup_port;
mod execution_gateway_port;
mod fill_archive_port;
mod ledger_store_port;
mod trading_calendar_port;

pub use delta_lookup_port::{DeltaLookupPort, DeltaQuote};
pub use execution_gateway_port::{ExecutionGatewayPort, GatewayError};
pub use fill_archive_port::FillArchivePort;
pub use ledger_store_port::{LedgerStoreError, LedgerStorePort};
pub use trading_calendar_port::{CalendarError, TradingCalendarPort};
