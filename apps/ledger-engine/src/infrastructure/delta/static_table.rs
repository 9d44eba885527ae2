//! Static delta table.
//!
//! An in-process `DeltaLookupPort` for replay runs and tests. Contracts not
//! in the table answer with the configured fallback quote, `NoModelGreeks`
//! by default (the model service is simply absent offline).

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::application::ports::{DeltaLookupPort, DeltaQuote};
use crate::domain::shared::Symbol;

/// Table-backed implementation of `DeltaLookupPort`.
#[derive(Debug, Default)]
pub struct StaticDeltaLookup {
    table: RwLock<HashMap<(Symbol, NaiveDate, Decimal), DeltaQuote>>,
    fallback: DeltaQuote,
}

impl StaticDeltaLookup {
    /// Create an empty table answering `NoModelGreeks` for everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table answering `InvalidContract` for everything.
    #[must_use]
    pub fn rejecting_unknown_contracts() -> Self {
        Self {
            table: RwLock::new(HashMap::new()),
            fallback: DeltaQuote::InvalidContract,
        }
    }

    /// Record a model delta for a contract.
    pub fn insert(&self, symbol: Symbol, expiry: NaiveDate, strike: Decimal, delta: Decimal) {
        self.table
            .write()
            .unwrap()
            .insert((symbol, expiry, strike), DeltaQuote::Model(delta));
    }

    /// Record a no-greeks answer for a contract.
    pub fn insert_no_model(&self, symbol: Symbol, expiry: NaiveDate, strike: Decimal) {
        self.table
            .write()
            .unwrap()
            .insert((symbol, expiry, strike), DeltaQuote::NoModelGreeks);
    }
}

#[async_trait]
impl DeltaLookupPort for StaticDeltaLookup {
    async fn get_delta(&self, symbol: &Symbol, expiry: NaiveDate, strike: Decimal) -> DeltaQuote {
        self.table
            .read()
            .unwrap()
            .get(&(symbol.clone(), expiry, strike))
            .copied()
            .unwrap_or(self.fallback)
    }
}
