//! Contract value object for fills and portfolio legs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Symbol;

/// A tradable instrument as it appears on a fill or a portfolio leg.
///
/// The program only ever holds stock and short calls against it, so the
/// option side is a call contract with a strike and an expiration date
/// (the "DOE"). Combo (bag) orders never appear here; each of their legs
/// carries its own `Contract`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Contract {
    /// Common stock of the underlying.
    Stock {
        /// Underlying ticker.
        symbol: Symbol,
    },
    /// A call option on the underlying.
    Call {
        /// Underlying ticker.
        symbol: Symbol,
        /// Strike price.
        strike: Decimal,
        /// Expiration date.
        expiry: NaiveDate,
    },
}

impl Contract {
    /// Convenience constructor for a stock contract.
    #[must_use]
    pub fn stock(symbol: impl Into<Symbol>) -> Self {
        Self::Stock {
            symbol: symbol.into(),
        }
    }

    /// Convenience constructor for a call contract.
    #[must_use]
    pub fn call(symbol: impl Into<Symbol>, strike: Decimal, expiry: NaiveDate) -> Self {
        Self::Call {
            symbol: symbol.into(),
            strike,
            expiry,
        }
    }

    /// The underlying ticker.
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        match self {
            Self::Stock { symbol } | Self::Call { symbol, .. } => symbol,
        }
    }

    /// Whether this is a stock leg.
    #[must_use]
    pub fn is_stock(&self) -> bool {
        matches!(self, Self::Stock { .. })
    }

    /// Whether this is an option leg.
    #[must_use]
    pub fn is_call(&self) -> bool {
        matches!(self, Self::Call { .. })
    }

    /// Strike price, if this is a call.
    #[must_use]
    pub fn strike(&self) -> Option<Decimal> {
        match self {
            Self::Call { strike, .. } => Some(*strike),
            Self::Stock { .. } => None,
        }
    }

    /// Expiration date, if this is a call.
    #[must_use]
    pub fn expiry(&self) -> Option<NaiveDate> {
        match self {
            Self::Call { expiry, .. } => Some(*expiry),
            Self::Stock { .. } => None,
        }
    }
}
