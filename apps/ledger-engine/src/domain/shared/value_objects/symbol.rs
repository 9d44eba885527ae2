//! Symbol and ledger row-key value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An underlying ticker symbol.
///
/// Normalized to uppercase. Option legs are identified by their underlying
/// symbol plus structured strike/expiry fields, so no OCC encoding is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new Symbol.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().to_uppercase())
    }

    /// Get the ticker string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Key under which trade legs accumulate into one ledger row.
///
/// A rollover spans two rows for the same ticker: the buy-back leg posts to
/// the primary key and the new write leg to the synthetic key, rendered with
/// a trailing asterisk (`SPY*`). The `ticker` column of both rows carries the
/// plain symbol; only the accumulation key differs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowKey {
    symbol: Symbol,
    rollover_write: bool,
}

impl RowKey {
    /// The primary key for a ticker.
    #[must_use]
    pub fn primary(symbol: Symbol) -> Self {
        Self {
            symbol,
            rollover_write: false,
        }
    }

    /// The synthetic key for the write leg of a rollover.
    #[must_use]
    pub fn rollover_write(symbol: Symbol) -> Self {
        Self {
            symbol,
            rollover_write: true,
        }
    }

    /// The underlying ticker this key belongs to.
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Whether this is the synthetic rollover-write key.
    #[must_use]
    pub fn is_rollover_write(&self) -> bool {
        self.rollover_write
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rollover_write {
            write!(f, "{}*", self.symbol)
        } else {
            write!(f, "{}", self.symbol)
        }
    }
}
