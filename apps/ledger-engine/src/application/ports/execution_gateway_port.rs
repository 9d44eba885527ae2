//! Execution Gateway Port (Driven Port)
//!
//! Post-trade data from the brokerage: today's fills, the end-of-day
//! portfolio snapshot, and the account value.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::position_report::PortfolioPosition;
use crate::domain::trade_capture::ExecutionReport;

/// Execution gateway error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// Connection error.
    #[error("Gateway connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Malformed payload from the gateway.
    #[error("Gateway data error: {message}")]
    DataError {
        /// Error details.
        message: String,
    },

    /// Unknown error.
    #[error("Gateway error: {message}")]
    Unknown {
        /// Error details.
        message: String,
    },
}

/// Port for consuming post-trade data from the brokerage.
///
/// Calls are synchronous request/response; retries belong to the caller,
/// never to the reconciliation engine.
#[async_trait]
pub trait ExecutionGatewayPort: Send + Sync {
    /// Today's execution reports, one per order.
    async fn get_fills_for_today(&self) -> Result<Vec<ExecutionReport>, GatewayError>;

    /// The end-of-day portfolio snapshot, one record per leg.
    async fn get_portfolio_snapshot(&self) -> Result<Vec<PortfolioPosition>, GatewayError>;

    /// Net liquidation value of the account.
    async fn get_account_value(&self) -> Result<Decimal, GatewayError>;
}
