//! Execution fill value objects.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::Contract;

/// Side of an execution as reported by the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FillSide {
    /// Bought.
    Bot,
    /// Sold.
    Sld,
}

impl FillSide {
    /// Sign applied to the reported quantity: sales are negative.
    #[must_use]
    pub fn sign(self) -> Decimal {
        match self {
            Self::Bot => Decimal::ONE,
            Self::Sld => Decimal::NEGATIVE_ONE,
        }
    }

    /// Whether this is a purchase.
    #[must_use]
    pub fn is_buy(self) -> bool {
        matches!(self, Self::Bot)
    }

    /// Whether this is a sale.
    #[must_use]
    pub fn is_sell(self) -> bool {
        matches!(self, Self::Sld)
    }
}

impl fmt::Display for FillSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bot => write!(f, "BOT"),
            Self::Sld => write!(f, "SLD"),
        }
    }
}

/// One execution event for a leg.
///
/// Quantities are unsigned as reported; options are counted in contracts
/// (one contract notionally covers 100 underlying shares). Timestamps arrive
/// in UTC and are converted to the venue's zone when ledger keys are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    /// Execution side.
    pub side: FillSide,
    /// Unsigned share or contract count.
    pub shares: Decimal,
    /// Execution price.
    pub price: Decimal,
    /// Execution time (UTC at the source).
    pub time: DateTime<Utc>,
}

/// Commission report attached to a fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionReport {
    /// Commission charged for this fill.
    pub commission: Decimal,
    /// Realized P&L, when the venue attributes any to this fill.
    pub realized_pnl: Option<Decimal>,
}

impl CommissionReport {
    /// Realized P&L with the absent case collapsed to zero.
    #[must_use]
    pub fn realized_pnl_or_zero(&self) -> Decimal {
        self.realized_pnl.unwrap_or(Decimal::ZERO)
    }
}

/// One fill: the executed leg's contract plus execution and commission data.
///
/// For combo orders each fill carries its own leg contract; the parent
/// order's contract only describes the bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    /// Contract of the executed leg.
    pub contract: Contract,
    /// Execution event.
    pub execution: Execution,
    /// Commission report for the event.
    pub commission_report: CommissionReport,
}
