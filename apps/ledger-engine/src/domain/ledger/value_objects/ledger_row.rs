//! The ledger row record and its merge semantics.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Symbol;

use super::ActionLabel;

/// Basis sentinel written when the prior ledger is ambiguous for a ticker.
pub const AMBIGUOUS_BASIS: Decimal = dec!(-9999);

/// Delta column sentinel: the contract was queried but no model greek was
/// available.
pub const DELTA_NO_MODEL: Decimal = dec!(-99);

/// Delta column sentinel: the contract specification did not resolve to a
/// tradable contract.
pub const DELTA_INVALID_CONTRACT: Decimal = dec!(-999);

/// One ledger record: a day's merged trade activity for a ticker, or an
/// end-of-day position observation.
///
/// Every column of the store schema is declared up front; columns not
/// populated for a given action stay `None`. Rows are only ever mutated
/// through [`LedgerRow::merge`], which either overwrites scalars or sums
/// accumulators — it never blanks a populated field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Venue-local date of the last leg or observation.
    pub date: NaiveDate,
    /// Venue-local time, `%H:%M`.
    pub time: String,
    /// Action label.
    pub action: ActionLabel,
    /// Underlying ticker (plain symbol even on a rollover-write row).
    pub ticker: Symbol,
    /// Stock market or execution price.
    pub price: Option<Decimal>,
    /// Entry price of the held underlying lot.
    #[serde(rename = "trade price")]
    pub trade_price: Option<Decimal>,
    /// Reference price for leg-level unrealized P&L.
    #[serde(rename = "leg price")]
    pub leg_price: Option<Decimal>,
    /// Option strike.
    pub strike: Option<Decimal>,
    /// Option expiration date.
    #[serde(rename = "DOE")]
    pub expiry: Option<NaiveDate>,
    /// Option market or execution price.
    #[serde(rename = "option price")]
    pub option_price: Option<Decimal>,
    /// Option entry price.
    #[serde(rename = "option trade price")]
    pub option_trade_price: Option<Decimal>,
    /// Commission, cumulative across the row's legs.
    pub commission: Option<Decimal>,
    /// Signed option contract count.
    #[serde(rename = "option size")]
    pub option_size: Option<Decimal>,
    /// Signed underlying share count.
    #[serde(rename = "underlying size")]
    pub underlying_size: Option<Decimal>,
    /// Dollar value of the legs posted to this row.
    #[serde(rename = "position bal")]
    pub position_balance: Option<Decimal>,
    /// Account value snapshot.
    #[serde(rename = "acct bal")]
    pub account_balance: Option<Decimal>,
    /// Realized/unrealized P&L of the underlying.
    #[serde(rename = "P/L underlying")]
    pub pnl_underlying: Option<Decimal>,
    /// Leg-level P&L of the underlying against the leg price.
    #[serde(rename = "P/L underlying leg")]
    pub pnl_underlying_leg: Option<Decimal>,
    /// Realized/unrealized P&L of the option.
    #[serde(rename = "P/L option")]
    pub pnl_option: Option<Decimal>,
    /// Option market delta at observation time, or a lookup sentinel.
    pub delta: Option<Decimal>,
}

impl LedgerRow {
    /// Create an empty row for a ticker.
    #[must_use]
    pub fn new(ticker: Symbol, date: NaiveDate, time: String, action: ActionLabel) -> Self {
        Self {
            date,
            time,
            action,
            ticker,
            price: None,
            trade_price: None,
            leg_price: None,
            strike: None,
            expiry: None,
            option_price: None,
            option_trade_price: None,
            commission: None,
            option_size: None,
            underlying_size: None,
            position_balance: None,
            account_balance: None,
            pnl_underlying: None,
            pnl_underlying_leg: None,
            pnl_option: None,
            delta: None,
        }
    }

    /// Merge one leg's contribution into the row.
    ///
    /// Scalar fields overwrite when the patch carries a value; accumulator
    /// fields add the patch's delta, initializing from zero. A patch can
    /// never blank a populated column.
    pub fn merge(&mut self, patch: RowPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(action) = patch.action {
            self.action = action;
        }
        overwrite(&mut self.price, patch.price);
        overwrite(&mut self.trade_price, patch.trade_price);
        overwrite(&mut self.leg_price, patch.leg_price);
        overwrite(&mut self.strike, patch.strike);
        overwrite(&mut self.expiry, patch.expiry);
        overwrite(&mut self.option_price, patch.option_price);
        overwrite(&mut self.option_trade_price, patch.option_trade_price);
        overwrite(&mut self.account_balance, patch.account_balance);
        overwrite(&mut self.delta, patch.delta);
        accumulate(&mut self.commission, patch.commission_delta);
        accumulate(&mut self.option_size, patch.option_size_delta);
        accumulate(&mut self.underlying_size, patch.underlying_size_delta);
        accumulate(&mut self.position_balance, patch.position_balance_delta);
        accumulate(&mut self.pnl_underlying, patch.pnl_underlying_delta);
        accumulate(&mut self.pnl_underlying_leg, patch.pnl_underlying_leg_delta);
        accumulate(&mut self.pnl_option, patch.pnl_option_delta);
    }
}

fn overwrite<T>(field: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *field = value;
    }
}

fn accumulate(field: &mut Option<Decimal>, delta: Option<Decimal>) {
    if let Some(delta) = delta {
        *field = Some(field.unwrap_or(Decimal::ZERO) + delta);
    }
}

/// One leg's contribution to a ledger row.
///
/// `None` means "leave the column alone" for scalars and "no contribution"
/// for accumulators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowPatch {
    /// Overwrites the row date.
    pub date: Option<NaiveDate>,
    /// Overwrites the row time.
    pub time: Option<String>,
    /// Overwrites the action label.
    pub action: Option<ActionLabel>,
    /// Overwrites the stock price.
    pub price: Option<Decimal>,
    /// Overwrites the underlying entry price.
    pub trade_price: Option<Decimal>,
    /// Overwrites the leg reference price.
    pub leg_price: Option<Decimal>,
    /// Overwrites the strike.
    pub strike: Option<Decimal>,
    /// Overwrites the expiration date.
    pub expiry: Option<NaiveDate>,
    /// Overwrites the option price.
    pub option_price: Option<Decimal>,
    /// Overwrites the option entry price.
    pub option_trade_price: Option<Decimal>,
    /// Overwrites the account value snapshot.
    pub account_balance: Option<Decimal>,
    /// Overwrites the delta column.
    pub delta: Option<Decimal>,
    /// Adds to the cumulative commission.
    pub commission_delta: Option<Decimal>,
    /// Adds to the signed option contract count.
    pub option_size_delta: Option<Decimal>,
    /// Adds to the signed underlying share count.
    pub underlying_size_delta: Option<Decimal>,
    /// Adds this leg's dollar value to the position balance.
    pub position_balance_delta: Option<Decimal>,
    /// Adds to the underlying P&L.
    pub pnl_underlying_delta: Option<Decimal>,
    /// Adds to the underlying leg P&L.
    pub pnl_underlying_leg_delta: Option<Decimal>,
    /// Adds to the option P&L.
    pub pnl_option_delta: Option<Decimal>,
}
