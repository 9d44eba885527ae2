//! Cost-basis recovery for stock and option legs.

use rust_decimal::Decimal;

use crate::domain::ledger::value_objects::{LedgerRow, PriorLedger};
use crate::domain::shared::Symbol;
use crate::domain::trade_capture::FillSide;

/// Resolved basis prices for a stock leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockBasis {
    /// Entry price of the held underlying lot.
    pub trade_price: Decimal,
    /// Reference price for leg-level unrealized P&L.
    pub leg_price: Decimal,
    /// A sale had no prior position and no same-day buy to match; basis
    /// fields are zero and the row must be flagged for manual review.
    pub not_found: bool,
}

impl StockBasis {
    fn found(trade_price: Decimal, leg_price: Decimal) -> Self {
        Self {
            trade_price,
            leg_price,
            not_found: false,
        }
    }

    fn not_found() -> Self {
        Self {
            trade_price: Decimal::ZERO,
            leg_price: Decimal::ZERO,
            not_found: true,
        }
    }
}

/// Recovers `trade price` / `leg price` / `option trade price` for a leg,
/// either from yesterday's ledger (continued or closed positions) or from
/// the current execution (newly opened positions).
#[derive(Debug, Clone, Copy, Default)]
pub struct BasisResolver;

impl BasisResolver {
    /// Resolve basis for a plain stock leg.
    ///
    /// `cumulative_shares` is the ticker's signed share total after this
    /// fill; a buy that exactly negates yesterday's position is a short
    /// cover and carries yesterday's basis forward. `row_so_far` is the
    /// ticker's ledger row as built up by earlier fills today, if any.
    #[must_use]
    pub fn resolve_stock(
        side: FillSide,
        execution_price: Decimal,
        cumulative_shares: Decimal,
        prior: &PriorLedger,
        symbol: &Symbol,
        row_so_far: Option<&LedgerRow>,
    ) -> StockBasis {
        let prior_rows = prior.count_for(symbol);
        match side {
            FillSide::Bot => {
                if prior_rows == 0 {
                    return StockBasis::found(execution_price, execution_price);
                }
                let closes_short = prior
                    .first_underlying_size(symbol)
                    .is_some_and(|prev| cumulative_shares == -prev);
                if closes_short {
                    Self::carried(prior, symbol, execution_price)
                } else {
                    // Adding to or re-opening a long resets the basis.
                    StockBasis::found(execution_price, execution_price)
                }
            }
            FillSide::Sld => {
                if prior_rows >= 1 {
                    return Self::carried(prior, symbol, execution_price);
                }
                // No prior position: a same-day buy may already have fixed
                // the basis on this row. Otherwise this opens a short, which
                // the order layer is supposed to prevent.
                match row_so_far.and_then(|row| row.trade_price.zip(row.leg_price)) {
                    Some((trade_price, leg_price)) => StockBasis::found(trade_price, leg_price),
                    None => StockBasis::not_found(),
                }
            }
        }
    }

    /// Resolve basis for the stock leg of a combo order.
    ///
    /// A bought leg (the buy-write case) always prices at the execution; a
    /// sold leg carries yesterday's basis forward.
    #[must_use]
    pub fn resolve_combo_stock(
        side: FillSide,
        execution_price: Decimal,
        prior: &PriorLedger,
        symbol: &Symbol,
    ) -> StockBasis {
        match side {
            FillSide::Bot => StockBasis::found(execution_price, execution_price),
            FillSide::Sld => {
                if prior.count_for(symbol) >= 1 {
                    Self::carried(prior, symbol, execution_price)
                } else {
                    StockBasis::not_found()
                }
            }
        }
    }

    /// `option trade price` for a leg that closes an option position held
    /// since yesterday (a rollover's buy-back leg, or a `CLOSE CC`).
    ///
    /// The entry price predates today's trade, so it comes from yesterday's
    /// single row for the ticker; without exactly one row the execution
    /// price stands.
    #[must_use]
    pub fn closing_option_trade_price(
        prior: &PriorLedger,
        symbol: &Symbol,
        execution_price: Decimal,
    ) -> Decimal {
        prior
            .single_row(symbol)
            .and_then(|row| row.option_trade_price)
            .unwrap_or(execution_price)
    }

    fn carried(prior: &PriorLedger, symbol: &Symbol, execution_price: Decimal) -> StockBasis {
        StockBasis::found(
            prior.max_trade_price(symbol).unwrap_or(execution_price),
            prior.max_leg_price(symbol).unwrap_or(execution_price),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::value_objects::{ActionLabel, RowPatch};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn prior_with(ticker: &str, trade_price: Decimal, leg_price: Decimal, size: Decimal) -> PriorLedger {
        let mut row = LedgerRow::new(
            Symbol::new(ticker),
            NaiveDate::from_ymd_opt(2023, 7, 19).unwrap(),
            "16:00".to_string(),
            ActionLabel::observe(),
        );
        row.merge(RowPatch {
            trade_price: Some(trade_price),
            leg_price: Some(leg_price),
            underlying_size_delta: Some(size),
            option_trade_price: Some(dec!(2.10)),
            ..RowPatch::default()
        });
        PriorLedger::new(vec![row])
    }

    #[test]
    fn new_long_prices_at_execution() {
        let basis = BasisResolver::resolve_stock(
            FillSide::Bot,
            dec!(50),
            dec!(100),
            &PriorLedger::empty(),
            &Symbol::new("SPY"),
            None,
        );
        assert_eq!(basis.trade_price, dec!(50));
        assert_eq!(basis.leg_price, dec!(50));
        assert!(!basis.not_found);
    }

    #[test]
    fn sale_with_prior_position_carries_basis_forward() {
        let prior = prior_with("SPY", dec!(48), dec!(49), dec!(100));
        let basis = BasisResolver::resolve_stock(
            FillSide::Sld,
            dec!(55),
            dec!(-100),
            &prior,
            &Symbol::new("SPY"),
            None,
        );
        assert_eq!(basis.trade_price, dec!(48));
        assert_eq!(basis.leg_price, dec!(49));
    }

    #[test]
    fn short_cover_carries_basis_forward() {
        let prior = prior_with("SPY", dec!(48), dec!(49), dec!(-100));
        let basis = BasisResolver::resolve_stock(
            FillSide::Bot,
            dec!(55),
            dec!(100),
            &prior,
            &Symbol::new("SPY"),
            None,
        );
        assert_eq!(basis.trade_price, dec!(48));
    }

    #[test]
    fn buy_on_top_of_long_resets_basis() {
        let prior = prior_with("SPY", dec!(48), dec!(49), dec!(100));
        let basis = BasisResolver::resolve_stock(
            FillSide::Bot,
            dec!(55),
            dec!(200),
            &prior,
            &Symbol::new("SPY"),
            None,
        );
        assert_eq!(basis.trade_price, dec!(55));
        assert_eq!(basis.leg_price, dec!(55));
    }

    #[test]
    fn unmatched_sale_reports_not_found() {
        let basis = BasisResolver::resolve_stock(
            FillSide::Sld,
            dec!(55),
            dec!(-100),
            &PriorLedger::empty(),
            &Symbol::new("SPY"),
            None,
        );
        assert!(basis.not_found);
        assert_eq!(basis.trade_price, Decimal::ZERO);
        assert_eq!(basis.leg_price, Decimal::ZERO);
    }

    #[test]
    fn sale_matching_same_day_buy_keeps_todays_basis() {
        let mut row = LedgerRow::new(
            Symbol::new("SPY"),
            NaiveDate::from_ymd_opt(2023, 7, 20).unwrap(),
            "10:01".to_string(),
            ActionLabel::stock_side(FillSide::Bot),
        );
        row.merge(RowPatch {
            trade_price: Some(dec!(52)),
            leg_price: Some(dec!(52)),
            ..RowPatch::default()
        });
        let basis = BasisResolver::resolve_stock(
            FillSide::Sld,
            dec!(55),
            dec!(0),
            &PriorLedger::empty(),
            &Symbol::new("SPY"),
            Some(&row),
        );
        assert!(!basis.not_found);
        assert_eq!(basis.trade_price, dec!(52));
    }

    #[test]
    fn rollover_duplicates_resolve_to_the_maximum() {
        let mut a = LedgerRow::new(
            Symbol::new("SPY"),
            NaiveDate::from_ymd_opt(2023, 7, 19).unwrap(),
            "16:00".to_string(),
            ActionLabel::observe(),
        );
        a.merge(RowPatch {
            trade_price: Some(dec!(48)),
            leg_price: Some(dec!(48)),
            ..RowPatch::default()
        });
        let mut b = a.clone();
        b.merge(RowPatch {
            trade_price: Some(dec!(50)),
            leg_price: Some(dec!(47)),
            ..RowPatch::default()
        });
        let prior = PriorLedger::new(vec![a, b]);
        let basis = BasisResolver::resolve_stock(
            FillSide::Sld,
            dec!(55),
            dec!(-100),
            &prior,
            &Symbol::new("SPY"),
            None,
        );
        assert_eq!(basis.trade_price, dec!(50));
        assert_eq!(basis.leg_price, dec!(48));
    }

    #[test]
    fn closing_option_price_comes_from_yesterday() {
        let prior = prior_with("SPY", dec!(48), dec!(49), dec!(100));
        let price =
            BasisResolver::closing_option_trade_price(&prior, &Symbol::new("SPY"), dec!(3.00));
        assert_eq!(price, dec!(2.10));
    }

    #[test]
    fn closing_option_price_falls_back_to_execution() {
        let price = BasisResolver::closing_option_trade_price(
            &PriorLedger::empty(),
            &Symbol::new("SPY"),
            dec!(3.00),
        );
        assert_eq!(price, dec!(3.00));
    }

    #[test]
    fn combo_stock_buy_prices_at_execution() {
        let prior = prior_with("SPY", dec!(48), dec!(49), dec!(100));
        let basis =
            BasisResolver::resolve_combo_stock(FillSide::Bot, dec!(50), &prior, &Symbol::new("SPY"));
        assert_eq!(basis.trade_price, dec!(50));
        assert_eq!(basis.leg_price, dec!(50));
    }
}
