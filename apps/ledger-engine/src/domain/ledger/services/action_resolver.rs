//! Ordered classification rules for the action label.

use crate::domain::ledger::value_objects::{ActionLabel, LedgerRow, PriorLedger};
use crate::domain::shared::Symbol;
use crate::domain::trade_capture::{ComboKind, FillSide};

/// Assigns action labels from leg type, side, and what the ticker has
/// already logged today.
///
/// The rules are order-independent across leg arrival: when the row already
/// carries the other asset class's label, the labels are concatenated with
/// the stock side first, whichever leg was processed first. Re-running the
/// same fills yields the same label.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionResolver;

impl ActionResolver {
    /// Label for a standalone option leg (not part of a combo).
    ///
    /// A sale writes a covered call. A purchase closes one when yesterday's
    /// single row shows both an option price and an underlying price;
    /// otherwise it is an outright call purchase.
    #[must_use]
    pub fn option_only_label(side: FillSide, prior: &PriorLedger, symbol: &Symbol) -> ActionLabel {
        match side {
            FillSide::Sld => ActionLabel::sell_cc(),
            FillSide::Bot => {
                let closes_held_call = prior
                    .single_row(symbol)
                    .is_some_and(|row| row.option_price.is_some() && row.price.is_some());
                if closes_held_call {
                    ActionLabel::close_cc()
                } else {
                    ActionLabel::buy_call()
                }
            }
        }
    }

    /// Label for an option leg of a classified combo.
    #[must_use]
    pub fn combo_option_label(kind: ComboKind, side: FillSide) -> ActionLabel {
        match (kind, side) {
            (ComboKind::Rollover, FillSide::Sld) => ActionLabel::rollover_write(),
            (ComboKind::Rollover, FillSide::Bot) => ActionLabel::rollover_close(),
            (ComboKind::BuyWrite, _) => ActionLabel::buy_write(),
            (ComboKind::Unknown, _) => ActionLabel::unknown(),
        }
    }

    /// Label for the stock leg of a classified combo.
    #[must_use]
    pub fn combo_stock_label(kind: ComboKind) -> ActionLabel {
        match kind {
            ComboKind::BuyWrite => ActionLabel::buy_write(),
            ComboKind::Rollover => ActionLabel::unknown(),
            ComboKind::Unknown => ActionLabel::unknown(),
        }
    }

    /// Compose an option label onto whatever the row already holds.
    ///
    /// If a stock leg was logged first, its label comes first.
    #[must_use]
    pub fn composed_for_option_leg(
        row_so_far: Option<&LedgerRow>,
        option_label: ActionLabel,
    ) -> ActionLabel {
        match row_so_far {
            Some(row) if row.underlying_size.is_some() => {
                row.action.with_option_suffix(&option_label)
            }
            _ => option_label,
        }
    }

    /// Compose a stock side onto whatever the row already holds.
    ///
    /// If an option leg was logged first, the side is prefixed onto it.
    #[must_use]
    pub fn composed_for_stock_leg(row_so_far: Option<&LedgerRow>, side: FillSide) -> ActionLabel {
        match row_so_far {
            Some(row) if row.option_size.is_some() => row.action.with_stock_prefix(side),
            _ => ActionLabel::stock_side(side),
        }
    }
}
