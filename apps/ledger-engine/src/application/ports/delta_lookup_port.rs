//! Delta Lookup Port (Driven Port)
//!
//! Model delta for a call contract, with the unavailable cases encoded as
//! the ledger's in-band sentinels.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::ledger::value_objects::{DELTA_INVALID_CONTRACT, DELTA_NO_MODEL};
use crate::domain::shared::Symbol;

/// Result of a delta lookup.
///
/// Lookups never fail the run; the two unavailable cases map to distinct
/// sentinel values in the ledger's `delta` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeltaQuote {
    /// Model delta for the contract.
    Model(Decimal),
    /// The contract resolved but no model greek was available.
    #[default]
    NoModelGreeks,
    /// The expiration/strike did not resolve to a tradable contract.
    InvalidContract,
}

impl DeltaQuote {
    /// The value recorded in the ledger's `delta` column.
    #[must_use]
    pub fn column_value(&self) -> Decimal {
        match self {
            Self::Model(delta) => *delta,
            Self::NoModelGreeks => DELTA_NO_MODEL,
            Self::InvalidContract => DELTA_INVALID_CONTRACT,
        }
    }
}

/// Port for the per-contract delta lookup collaborator.
#[async_trait]
pub trait DeltaLookupPort: Send + Sync {
    /// Delta for the call identified by underlying, expiration and strike.
    async fn get_delta(&self, symbol: &Symbol, expiry: NaiveDate, strike: Decimal) -> DeltaQuote;
}
