//! End-of-day portfolio annotation against today's trades and yesterday's
//! ledger.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use crate::domain::ledger::services::LedgerRowBuilder;
use crate::domain::ledger::value_objects::{
    ActionLabel, LedgerRow, PriorLedger, RowPatch, AMBIGUOUS_BASIS, DELTA_INVALID_CONTRACT,
};
use crate::domain::position_report::value_objects::PortfolioPosition;
use crate::domain::shared::{RowKey, Symbol};

/// Delta column values pre-fetched per option contract, keyed by
/// (underlying, expiry, strike). Sentinels are already folded in.
pub type DeltaTable = HashMap<(Symbol, NaiveDate, Decimal), Decimal>;

/// Run-scoped inputs for one annotation pass.
#[derive(Debug, Clone)]
pub struct AnnotationContext {
    /// Run date (venue-local).
    pub date: NaiveDate,
    /// Run time, `%H:%M`.
    pub time: String,
    /// Account value snapshot.
    pub account_value: Decimal,
    /// Whether the run executes after the close of trading; enables the
    /// expiry adjustments (`Called Away` / `Expire CC`).
    pub after_close: bool,
    /// Pre-fetched delta column values.
    pub deltas: DeltaTable,
}

/// Result of the annotation pass.
#[derive(Debug, Clone)]
pub struct PortfolioAnnotation {
    /// One finalized row per held ticker.
    pub rows: Vec<LedgerRow>,
    /// Human-readable diagnostics gathered along the way.
    pub warnings: Vec<String>,
}

/// Per-ticker basis context resolved before folding the ticker's legs.
#[derive(Debug, Default)]
struct TickerBasis {
    trade_price: Option<Decimal>,
    leg_price: Option<Decimal>,
    option_trade_price: Option<Decimal>,
    /// No trade event fixed the stock leg price today; take the market's.
    refresh_leg_price: bool,
    action: Option<ActionLabel>,
}

/// Walks the end-of-day snapshot and produces one observation row per
/// ticker, cross-referencing today's trade rows and yesterday's ledger for
/// the basis fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortfolioAnnotator;

impl PortfolioAnnotator {
    /// Run the annotation pass.
    #[must_use]
    pub fn annotate(
        positions: &[PortfolioPosition],
        today_trades: &[LedgerRow],
        prior: &PriorLedger,
        ctx: &AnnotationContext,
    ) -> PortfolioAnnotation {
        let mut warnings = Vec::new();
        let mut builder = LedgerRowBuilder::new();

        // Explicit group-by: the snapshot's row order carries no meaning.
        let mut grouped: BTreeMap<Symbol, Vec<&PortfolioPosition>> = BTreeMap::new();
        for position in positions {
            grouped
                .entry(position.contract.symbol().clone())
                .or_default()
                .push(position);
        }

        for (symbol, legs) in &grouped {
            let basis = Self::resolve_basis(symbol, today_trades, prior, &mut warnings);
            let action = basis.action.clone().unwrap_or_else(ActionLabel::observe);
            for position in legs {
                let patch = if position.contract.is_call() {
                    Self::option_patch(position, &basis, &action, ctx)
                } else {
                    Self::stock_patch(position, &basis, &action, ctx)
                };
                builder.apply(RowKey::primary(symbol.clone()), patch);
            }
        }

        let mut rows = builder.into_rows();
        if ctx.after_close {
            for row in &mut rows {
                Self::adjust_for_expiry(row, ctx.date);
            }
        }

        PortfolioAnnotation { rows, warnings }
    }

    /// Select the basis rule from today's trade-row count for the ticker.
    fn resolve_basis(
        symbol: &Symbol,
        today_trades: &[LedgerRow],
        prior: &PriorLedger,
        warnings: &mut Vec<String>,
    ) -> TickerBasis {
        let today: Vec<&LedgerRow> = today_trades
            .iter()
            .filter(|row| &row.ticker == symbol)
            .collect();
        match today.as_slice() {
            [] => Self::inherited_basis(symbol, prior, warnings),
            [row] => Self::single_trade_basis(symbol, row, prior, warnings),
            [_, _] => Self::rollover_basis(symbol, &today, prior, warnings),
            _ => {
                let message = format!(
                    "{symbol}: {} trade rows for one ticker; ledger needs manual review",
                    today.len()
                );
                warn!("{message}");
                warnings.push(message);
                TickerBasis {
                    trade_price: Some(AMBIGUOUS_BASIS),
                    leg_price: Some(AMBIGUOUS_BASIS),
                    action: Some(ActionLabel::error()),
                    ..TickerBasis::default()
                }
            }
        }
    }

    /// No trade today: everything comes from yesterday, or zeros for a
    /// position first seen now.
    fn inherited_basis(
        symbol: &Symbol,
        prior: &PriorLedger,
        warnings: &mut Vec<String>,
    ) -> TickerBasis {
        match prior.count_for(symbol) {
            0 => TickerBasis {
                trade_price: Some(Decimal::ZERO),
                leg_price: Some(Decimal::ZERO),
                option_trade_price: Some(Decimal::ZERO),
                ..TickerBasis::default()
            },
            1 => TickerBasis {
                trade_price: prior.max_trade_price(symbol),
                leg_price: prior.max_leg_price(symbol),
                option_trade_price: prior.max_option_trade_price(symbol),
                ..TickerBasis::default()
            },
            n => {
                let message =
                    format!("{symbol}: {n} rows in yesterday's ledger; basis is ambiguous");
                warn!("{message}");
                warnings.push(message);
                TickerBasis {
                    trade_price: Some(AMBIGUOUS_BASIS),
                    leg_price: Some(AMBIGUOUS_BASIS),
                    ..TickerBasis::default()
                }
            }
        }
    }

    /// Exactly one trade row today: the row's action picks the rule.
    fn single_trade_basis(
        symbol: &Symbol,
        row: &LedgerRow,
        prior: &PriorLedger,
        warnings: &mut Vec<String>,
    ) -> TickerBasis {
        let prior_rows = prior.count_for(symbol);
        if row.action.is_sell_cc() {
            return match prior_rows {
                1 => TickerBasis {
                    trade_price: prior.max_trade_price(symbol),
                    option_trade_price: row.option_trade_price,
                    refresh_leg_price: true,
                    ..TickerBasis::default()
                },
                0 => {
                    let message =
                        format!("{symbol}: covered call written with no position on record");
                    warn!("{message}");
                    warnings.push(message);
                    TickerBasis {
                        trade_price: Some(Decimal::ZERO),
                        option_trade_price: row.option_trade_price,
                        action: Some(ActionLabel::unmatched_sell_cc()),
                        ..TickerBasis::default()
                    }
                }
                _ => Self::ambiguous_prior(symbol, prior_rows, warnings),
            };
        }
        if row.action.is_close_cc() {
            return match prior_rows {
                1 => TickerBasis {
                    trade_price: prior
                        .single_row(symbol)
                        .and_then(|prior_row| prior_row.trade_price),
                    option_trade_price: row.option_trade_price,
                    refresh_leg_price: true,
                    ..TickerBasis::default()
                },
                0 => {
                    let message =
                        format!("{symbol}: covered call closed with no position on record");
                    warn!("{message}");
                    warnings.push(message);
                    TickerBasis {
                        trade_price: Some(Decimal::ZERO),
                        leg_price: Some(Decimal::ZERO),
                        option_trade_price: row.option_trade_price,
                        action: Some(ActionLabel::unmatched_close_cc()),
                        ..TickerBasis::default()
                    }
                }
                _ => Self::ambiguous_prior(symbol, prior_rows, warnings),
            };
        }
        if row.action.is_buy_write() || row.action.starts_with_bot() {
            return TickerBasis {
                trade_price: row.trade_price,
                leg_price: row.leg_price,
                option_trade_price: row.option_trade_price,
                ..TickerBasis::default()
            };
        }
        if row.action.is_sld() {
            if prior_rows == 1 {
                let message = format!(
                    "{symbol}: stock sold but a position is still held, possible naked call"
                );
                warn!("{message}");
                warnings.push(message);
                return TickerBasis {
                    trade_price: prior.max_trade_price(symbol),
                    leg_price: row.leg_price,
                    option_trade_price: prior
                        .single_row(symbol)
                        .and_then(|prior_row| prior_row.option_trade_price),
                    ..TickerBasis::default()
                };
            }
            return Self::inherited_basis(symbol, prior, warnings);
        }
        // Other single-row labels (BUY CALL, rollover fragments, UNKNOWN)
        // fall back to yesterday's state.
        Self::inherited_basis(symbol, prior, warnings)
    }

    /// Two trade rows today mark a rollover: the write leg's row carries the
    /// new option entry price.
    fn rollover_basis(
        symbol: &Symbol,
        today: &[&LedgerRow],
        prior: &PriorLedger,
        warnings: &mut Vec<String>,
    ) -> TickerBasis {
        let write_row = today.iter().find(|row| row.action.is_rollover_write());
        if write_row.is_none() {
            let message =
                format!("{symbol}: two trade rows but no rollover write leg among them");
            warn!("{message}");
            warnings.push(message);
        }
        TickerBasis {
            trade_price: prior.max_trade_price(symbol),
            option_trade_price: write_row.and_then(|row| row.option_trade_price),
            refresh_leg_price: true,
            ..TickerBasis::default()
        }
    }

    fn ambiguous_prior(
        symbol: &Symbol,
        prior_rows: usize,
        warnings: &mut Vec<String>,
    ) -> TickerBasis {
        let message =
            format!("{symbol}: {prior_rows} rows in yesterday's ledger; basis is ambiguous");
        warn!("{message}");
        warnings.push(message);
        TickerBasis {
            trade_price: Some(AMBIGUOUS_BASIS),
            leg_price: Some(AMBIGUOUS_BASIS),
            action: Some(ActionLabel::error()),
            ..TickerBasis::default()
        }
    }

    fn stock_patch(
        position: &PortfolioPosition,
        basis: &TickerBasis,
        action: &ActionLabel,
        ctx: &AnnotationContext,
    ) -> RowPatch {
        // A rollover / SELL CC / CLOSE CC day fixes no stock price, so the
        // leg reference resets to the market.
        let leg_price = if basis.refresh_leg_price {
            position.market_price
        } else {
            basis.leg_price.unwrap_or(position.market_price)
        };
        RowPatch {
            date: Some(ctx.date),
            time: Some(ctx.time.clone()),
            action: Some(action.clone()),
            price: Some(position.market_price),
            trade_price: basis.trade_price,
            leg_price: Some(leg_price),
            account_balance: Some(ctx.account_value),
            underlying_size_delta: Some(position.position),
            position_balance_delta: Some(position.market_value),
            pnl_underlying_delta: Some(position.unrealized_pnl),
            pnl_underlying_leg_delta: Some(position.position * (position.market_price - leg_price)),
            ..RowPatch::default()
        }
    }

    fn option_patch(
        position: &PortfolioPosition,
        basis: &TickerBasis,
        action: &ActionLabel,
        ctx: &AnnotationContext,
    ) -> RowPatch {
        let delta = position
            .contract
            .expiry()
            .zip(position.contract.strike())
            .and_then(|(expiry, strike)| {
                ctx.deltas
                    .get(&(position.contract.symbol().clone(), expiry, strike))
                    .copied()
            })
            .unwrap_or(DELTA_INVALID_CONTRACT);
        RowPatch {
            date: Some(ctx.date),
            time: Some(ctx.time.clone()),
            action: Some(action.clone()),
            strike: position.contract.strike(),
            expiry: position.contract.expiry(),
            option_price: Some(position.market_price),
            option_trade_price: basis.option_trade_price,
            account_balance: Some(ctx.account_value),
            option_size_delta: Some(position.position),
            position_balance_delta: Some(position.market_value),
            pnl_option_delta: Some(position.unrealized_pnl),
            delta: Some(delta),
            ..RowPatch::default()
        }
    }

    /// Post-close: an option at or past expiry either had its shares called
    /// away (strike at or below the market) or expired worthless.
    fn adjust_for_expiry(row: &mut LedgerRow, today: NaiveDate) {
        let Some(expiry) = row.expiry else {
            return;
        };
        if expiry > today {
            return;
        }
        let in_the_money = row
            .strike
            .zip(row.price)
            .is_some_and(|(strike, price)| strike <= price);
        row.action = if in_the_money {
            ActionLabel::called_away()
        } else {
            ActionLabel::expire_cc()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::Contract;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 7, 21).unwrap()
    }

    fn ctx(after_close: bool) -> AnnotationContext {
        AnnotationContext {
            date: date(),
            time: "16:05".to_string(),
            account_value: dec!(100_000),
            after_close,
            deltas: DeltaTable::new(),
        }
    }

    fn stock_position(symbol: &str, shares: Decimal, market: Decimal) -> PortfolioPosition {
        PortfolioPosition::new(
            Contract::stock(symbol),
            shares,
            market,
            shares * market,
            dec!(0),
        )
    }

    fn call_position(
        symbol: &str,
        strike: Decimal,
        expiry: NaiveDate,
        contracts: Decimal,
        market: Decimal,
    ) -> PortfolioPosition {
        PortfolioPosition::new(
            Contract::call(symbol, strike, expiry),
            contracts,
            market,
            contracts * market * dec!(100),
            dec!(0),
        )
    }

    fn prior_row(ticker: &str) -> LedgerRow {
        let mut row = LedgerRow::new(
            Symbol::new(ticker),
            date() - chrono::Days::new(1),
            "16:00".to_string(),
            ActionLabel::observe(),
        );
        row.merge(RowPatch {
            price: Some(dec!(104)),
            trade_price: Some(dec!(100)),
            leg_price: Some(dec!(102)),
            option_price: Some(dec!(2.40)),
            option_trade_price: Some(dec!(2.10)),
            underlying_size_delta: Some(dec!(100)),
            option_size_delta: Some(dec!(-1)),
            ..RowPatch::default()
        });
        row
    }

    fn trade_row(ticker: &str, action: ActionLabel) -> LedgerRow {
        let mut row = LedgerRow::new(
            Symbol::new(ticker),
            date(),
            "15:30".to_string(),
            action,
        );
        row.merge(RowPatch {
            trade_price: Some(dec!(105)),
            leg_price: Some(dec!(105)),
            option_trade_price: Some(dec!(2.50)),
            ..RowPatch::default()
        });
        row
    }

    #[test]
    fn untraded_ticker_inherits_yesterdays_basis() {
        let prior = PriorLedger::new(vec![prior_row("SPY")]);
        let positions = vec![stock_position("SPY", dec!(100), dec!(105))];
        let result = PortfolioAnnotator::annotate(&positions, &[], &prior, &ctx(false));

        assert_eq!(result.rows.len(), 1);
        let row = &result.rows[0];
        assert_eq!(row.action, ActionLabel::observe());
        assert_eq!(row.trade_price, Some(dec!(100)));
        assert_eq!(row.leg_price, Some(dec!(102)));
        assert_eq!(row.pnl_underlying_leg, Some(dec!(100) * (dec!(105) - dec!(102))));
    }

    #[test]
    fn new_position_defaults_to_zero_basis() {
        let positions = vec![stock_position("SPY", dec!(100), dec!(105))];
        let result =
            PortfolioAnnotator::annotate(&positions, &[], &PriorLedger::empty(), &ctx(false));

        let row = &result.rows[0];
        assert_eq!(row.trade_price, Some(Decimal::ZERO));
        assert_eq!(row.leg_price, Some(Decimal::ZERO));
    }

    #[test]
    fn sell_cc_day_refreshes_leg_price_from_market() {
        let prior = PriorLedger::new(vec![prior_row("SPY")]);
        let trades = vec![trade_row("SPY", ActionLabel::sell_cc())];
        let expiry = date() + chrono::Days::new(7);
        let positions = vec![
            stock_position("SPY", dec!(100), dec!(106)),
            call_position("SPY", dec!(110), expiry, dec!(-1), dec!(2.45)),
        ];
        let result = PortfolioAnnotator::annotate(&positions, &trades, &prior, &ctx(false));

        assert_eq!(result.rows.len(), 1);
        let row = &result.rows[0];
        // Entry price inherited, leg price refreshed to market.
        assert_eq!(row.trade_price, Some(dec!(100)));
        assert_eq!(row.leg_price, Some(dec!(106)));
        assert_eq!(row.pnl_underlying_leg, Some(Decimal::ZERO));
        // The option entry price is today's write.
        assert_eq!(row.option_trade_price, Some(dec!(2.50)));
        // Stock and option leg values both posted.
        assert_eq!(
            row.position_balance,
            Some(dec!(100) * dec!(106) + dec!(-1) * dec!(2.45) * dec!(100))
        );
    }

    #[test]
    fn unmatched_sell_cc_is_flagged() {
        let trades = vec![trade_row("SPY", ActionLabel::sell_cc())];
        let positions = vec![stock_position("SPY", dec!(100), dec!(106))];
        let result =
            PortfolioAnnotator::annotate(&positions, &trades, &PriorLedger::empty(), &ctx(false));

        let row = &result.rows[0];
        assert_eq!(row.action, ActionLabel::unmatched_sell_cc());
        assert_eq!(row.trade_price, Some(Decimal::ZERO));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn buy_write_day_takes_todays_trade_basis() {
        let trades = vec![trade_row("SPY", ActionLabel::buy_write())];
        let positions = vec![stock_position("SPY", dec!(100), dec!(106))];
        let result =
            PortfolioAnnotator::annotate(&positions, &trades, &PriorLedger::empty(), &ctx(false));

        let row = &result.rows[0];
        assert_eq!(row.trade_price, Some(dec!(105)));
        assert_eq!(row.leg_price, Some(dec!(105)));
        assert_eq!(row.option_trade_price, Some(dec!(2.50)));
    }

    #[test]
    fn naked_call_sale_warns_and_inherits() {
        let prior = PriorLedger::new(vec![prior_row("SPY")]);
        let trades = vec![trade_row("SPY", ActionLabel::stock_side(
            crate::domain::trade_capture::FillSide::Sld,
        ))];
        let expiry = date() + chrono::Days::new(7);
        let positions = vec![call_position("SPY", dec!(110), expiry, dec!(-1), dec!(2.45))];
        let result = PortfolioAnnotator::annotate(&positions, &trades, &prior, &ctx(false));

        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("naked call"));
        let row = &result.rows[0];
        assert_eq!(row.trade_price, Some(dec!(100)));
        assert_eq!(row.option_trade_price, Some(dec!(2.10)));
    }

    #[test]
    fn rollover_day_pulls_entry_price_from_write_row() {
        let prior = PriorLedger::new(vec![prior_row("SPY")]);
        let close_row = trade_row("SPY", ActionLabel::rollover_close());
        let mut write_row = trade_row("SPY", ActionLabel::rollover_write());
        write_row.merge(RowPatch {
            option_trade_price: Some(dec!(2.80)),
            ..RowPatch::default()
        });
        let trades = vec![close_row, write_row];
        let expiry = date() + chrono::Days::new(7);
        let positions = vec![
            stock_position("SPY", dec!(100), dec!(106)),
            call_position("SPY", dec!(111), expiry, dec!(-1), dec!(2.75)),
        ];
        let result = PortfolioAnnotator::annotate(&positions, &trades, &prior, &ctx(false));

        let row = &result.rows[0];
        assert_eq!(row.trade_price, Some(dec!(100)));
        assert_eq!(row.option_trade_price, Some(dec!(2.80)));
        assert_eq!(row.leg_price, Some(dec!(106)));
    }

    #[test]
    fn ambiguous_prior_rows_write_sentinels() {
        let prior = PriorLedger::new(vec![prior_row("SPY"), prior_row("SPY"), prior_row("SPY")]);
        let positions = vec![stock_position("SPY", dec!(100), dec!(106))];
        let result = PortfolioAnnotator::annotate(&positions, &[], &prior, &ctx(false));

        let row = &result.rows[0];
        assert_eq!(row.trade_price, Some(AMBIGUOUS_BASIS));
        assert_eq!(row.leg_price, Some(AMBIGUOUS_BASIS));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn more_than_two_trade_rows_is_a_consistency_error() {
        let trades = vec![
            trade_row("SPY", ActionLabel::sell_cc()),
            trade_row("SPY", ActionLabel::close_cc()),
            trade_row("SPY", ActionLabel::buy_write()),
        ];
        let positions = vec![stock_position("SPY", dec!(100), dec!(106))];
        let result =
            PortfolioAnnotator::annotate(&positions, &trades, &PriorLedger::empty(), &ctx(false));

        let row = &result.rows[0];
        assert_eq!(row.action, ActionLabel::error());
        assert_eq!(row.trade_price, Some(AMBIGUOUS_BASIS));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn scenario_d_expiry_adjustments_after_close() {
        let prior = PriorLedger::new(vec![prior_row("SPY"), prior_row("QQQ")]);
        let positions = vec![
            stock_position("SPY", dec!(100), dec!(105)),
            call_position("SPY", dec!(100), date(), dec!(-1), dec!(5.10)),
            stock_position("QQQ", dec!(100), dec!(105)),
            call_position("QQQ", dec!(110), date(), dec!(-1), dec!(0.02)),
        ];
        let result = PortfolioAnnotator::annotate(&positions, &[], &prior, &ctx(true));

        let qqq = result
            .rows
            .iter()
            .find(|row| row.ticker == Symbol::new("QQQ"))
            .unwrap();
        let spy = result
            .rows
            .iter()
            .find(|row| row.ticker == Symbol::new("SPY"))
            .unwrap();
        // Strike 100 <= price 105: shares called away.
        assert_eq!(spy.action, ActionLabel::called_away());
        // Strike 110 > price 105: expires worthless.
        assert_eq!(qqq.action, ActionLabel::expire_cc());
    }

    #[test]
    fn expiry_adjustments_skipped_before_close() {
        let prior = PriorLedger::new(vec![prior_row("SPY")]);
        let positions = vec![
            stock_position("SPY", dec!(100), dec!(105)),
            call_position("SPY", dec!(100), date(), dec!(-1), dec!(5.10)),
        ];
        let result = PortfolioAnnotator::annotate(&positions, &[], &prior, &ctx(false));
        assert_eq!(result.rows[0].action, ActionLabel::observe());
    }

    #[test]
    fn future_expiries_are_left_alone_after_close() {
        let prior = PriorLedger::new(vec![prior_row("SPY")]);
        let positions = vec![
            stock_position("SPY", dec!(100), dec!(105)),
            call_position("SPY", dec!(100), date() + chrono::Days::new(7), dec!(-1), dec!(2.10)),
        ];
        let result = PortfolioAnnotator::annotate(&positions, &[], &prior, &ctx(true));
        assert_eq!(result.rows[0].action, ActionLabel::observe());
    }

    #[test]
    fn option_delta_sentinel_when_contract_unknown() {
        let prior = PriorLedger::new(vec![prior_row("SPY")]);
        let expiry = date() + chrono::Days::new(7);
        let positions = vec![call_position("SPY", dec!(110), expiry, dec!(-1), dec!(2.45))];
        let result = PortfolioAnnotator::annotate(&positions, &[], &prior, &ctx(false));

        assert_eq!(result.rows[0].delta, Some(DELTA_INVALID_CONTRACT));
    }

    #[test]
    fn option_delta_comes_from_the_table() {
        let prior = PriorLedger::new(vec![prior_row("SPY")]);
        let expiry = date() + chrono::Days::new(7);
        let mut context = ctx(false);
        context
            .deltas
            .insert((Symbol::new("SPY"), expiry, dec!(110)), dec!(0.38));
        let positions = vec![call_position("SPY", dec!(110), expiry, dec!(-1), dec!(2.45))];
        let result = PortfolioAnnotator::annotate(&positions, &[], &prior, &context);

        assert_eq!(result.rows[0].delta, Some(dec!(0.38)));
    }
}
