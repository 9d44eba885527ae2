//! The human-readable action label of a ledger row.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::trade_capture::FillSide;

/// Action label recorded on a ledger row.
///
/// Labels are composable: when a ticker trades both asset classes in one
/// day, the stock side is rendered first (`BOT SELL CC`), independent of
/// which leg's fill arrived first. Unresolvable situations degrade to
/// `UNKNOWN` or an `ERROR `-prefixed label; they are recorded, never thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLabel(String);

impl ActionLabel {
    /// Portfolio observation with no trade.
    #[must_use]
    pub fn observe() -> Self {
        Self("OBSERVE".to_string())
    }

    /// Wrote a covered call, no stock leg.
    #[must_use]
    pub fn sell_cc() -> Self {
        Self("SELL CC".to_string())
    }

    /// Bought back a covered call held since yesterday.
    #[must_use]
    pub fn close_cc() -> Self {
        Self("CLOSE CC".to_string())
    }

    /// Option purchase with no matching prior position.
    #[must_use]
    pub fn buy_call() -> Self {
        Self("BUY CALL".to_string())
    }

    /// Combo: bought stock and wrote calls in one order.
    #[must_use]
    pub fn buy_write() -> Self {
        Self("BUY WRITE".to_string())
    }

    /// Sell leg of a rollover combo.
    #[must_use]
    pub fn rollover_write() -> Self {
        Self("ROLLOVER WRITE".to_string())
    }

    /// Buy-back leg of a rollover combo.
    #[must_use]
    pub fn rollover_close() -> Self {
        Self("ROLLOVER CLOSE".to_string())
    }

    /// Covered-call sale with no position to cover it.
    #[must_use]
    pub fn unmatched_sell_cc() -> Self {
        Self("UNMATCHED SELL CC".to_string())
    }

    /// Covered-call close with no prior position on record.
    #[must_use]
    pub fn unmatched_close_cc() -> Self {
        Self("UNMATCHED CLOSE CC".to_string())
    }

    /// Expired in the money; shares assigned.
    #[must_use]
    pub fn called_away() -> Self {
        Self("Called Away".to_string())
    }

    /// Expired worthless.
    #[must_use]
    pub fn expire_cc() -> Self {
        Self("Expire CC".to_string())
    }

    /// No classification rule matched.
    #[must_use]
    pub fn unknown() -> Self {
        Self("UNKNOWN".to_string())
    }

    /// Data-consistency problem; row kept for manual review.
    #[must_use]
    pub fn error() -> Self {
        Self("ERROR".to_string())
    }

    /// Raw side label for a stock-only leg (`BOT` / `SLD`).
    #[must_use]
    pub fn stock_side(side: FillSide) -> Self {
        Self(side.to_string())
    }

    /// Compose `"<self> <option>"` — stock label first.
    #[must_use]
    pub fn with_option_suffix(&self, option: &Self) -> Self {
        Self(format!("{} {}", self.0, option.0))
    }

    /// Compose `"<side> <self>"` — a stock side prefixed onto an option label.
    #[must_use]
    pub fn with_stock_prefix(&self, side: FillSide) -> Self {
        Self(format!("{side} {}", self.0))
    }

    /// Flag the label for manual review (`ERROR <self>`).
    #[must_use]
    pub fn error_prefixed(&self) -> Self {
        Self(format!("ERROR {}", self.0))
    }

    /// The label text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact `SELL CC`.
    #[must_use]
    pub fn is_sell_cc(&self) -> bool {
        self.0 == "SELL CC"
    }

    /// Exact `CLOSE CC`.
    #[must_use]
    pub fn is_close_cc(&self) -> bool {
        self.0 == "CLOSE CC"
    }

    /// Exact `BUY WRITE`.
    #[must_use]
    pub fn is_buy_write(&self) -> bool {
        self.0 == "BUY WRITE"
    }

    /// Exact `SLD` (stock sold, any option leg untouched).
    #[must_use]
    pub fn is_sld(&self) -> bool {
        self.0 == "SLD"
    }

    /// Starts with `BOT` (stock bought, possibly composed).
    #[must_use]
    pub fn starts_with_bot(&self) -> bool {
        self.0.starts_with("BOT")
    }

    /// Contains the rollover write leg label.
    #[must_use]
    pub fn is_rollover_write(&self) -> bool {
        self.0 == "ROLLOVER WRITE"
    }

    /// Flagged for manual review.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.0.starts_with("ERROR")
    }
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
