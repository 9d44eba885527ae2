//! End-of-day portfolio position record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Contract;

/// One leg of the end-of-day portfolio snapshot.
///
/// The snapshot never reports bags; a covered-call position arrives as two
/// records, one stock and one short call, each priced at the market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPosition {
    /// Contract held.
    pub contract: Contract,
    /// Signed share or contract count.
    pub position: Decimal,
    /// Current market price per share or per contract point.
    pub market_price: Decimal,
    /// Current dollar value of the holding.
    pub market_value: Decimal,
    /// Unrealized P&L as reported by the gateway.
    pub unrealized_pnl: Decimal,
}

impl PortfolioPosition {
    /// Convenience constructor.
    #[must_use]
    pub fn new(
        contract: Contract,
        position: Decimal,
        market_price: Decimal,
        market_value: Decimal,
        unrealized_pnl: Decimal,
    ) -> Self {
        Self {
            contract,
            position,
            market_price,
            market_value,
            unrealized_pnl,
        }
    }
}
