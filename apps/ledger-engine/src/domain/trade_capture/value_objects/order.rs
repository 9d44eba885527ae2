//! Order-level value objects returned by the execution gateway.

use serde::{Deserialize, Serialize};

use crate::domain::shared::Symbol;

use super::Fill;

/// Declared action of a combo leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LegAction {
    /// The leg buys.
    Buy,
    /// The leg sells.
    Sell,
}

/// One declared leg of a combo (bag) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboLeg {
    /// Leg ratio. Option legs of a rollover carry 1; the stock leg of a
    /// buy-write carries 100.
    pub ratio: u32,
    /// Declared leg action.
    pub action: LegAction,
}

impl ComboLeg {
    /// Convenience constructor.
    #[must_use]
    pub fn new(ratio: u32, action: LegAction) -> Self {
        Self { ratio, action }
    }
}

/// The contract of a whole order as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderContract {
    /// Plain stock order.
    Stock {
        /// Underlying ticker.
        symbol: Symbol,
    },
    /// Plain option order.
    Call {
        /// Underlying ticker.
        symbol: Symbol,
    },
    /// Combo (bag) order with declared legs.
    Combo {
        /// Underlying ticker.
        symbol: Symbol,
        /// Declared legs, in submission order.
        legs: Vec<ComboLeg>,
    },
}

impl OrderContract {
    /// The underlying ticker.
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        match self {
            Self::Stock { symbol } | Self::Call { symbol } | Self::Combo { symbol, .. } => symbol,
        }
    }
}

/// One order's post-trade record: its contract plus every fill event.
///
/// Combo fills each carry their own leg contract; stock and option orders
/// repeat the order contract on each fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Contract of the order as submitted.
    pub contract: OrderContract,
    /// Fill events, in arrival order.
    pub fills: Vec<Fill>,
}

impl ExecutionReport {
    /// Build a report for a plain stock order.
    #[must_use]
    pub fn stock(symbol: impl Into<Symbol>, fills: Vec<Fill>) -> Self {
        Self {
            contract: OrderContract::Stock {
                symbol: symbol.into(),
            },
            fills,
        }
    }

    /// Build a report for a plain option order.
    #[must_use]
    pub fn call(symbol: impl Into<Symbol>, fills: Vec<Fill>) -> Self {
        Self {
            contract: OrderContract::Call {
                symbol: symbol.into(),
            },
            fills,
        }
    }

    /// Build a report for a combo order.
    #[must_use]
    pub fn combo(symbol: impl Into<Symbol>, legs: Vec<ComboLeg>, fills: Vec<Fill>) -> Self {
        Self {
            contract: OrderContract::Combo {
                symbol: symbol.into(),
                legs,
            },
            fills,
        }
    }
}
