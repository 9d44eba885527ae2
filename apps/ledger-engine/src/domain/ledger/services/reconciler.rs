//! One-pass reconciliation of a day's fills into the trade ledger.

use chrono_tz::Tz;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::domain::ledger::services::{ActionResolver, BasisResolver, LedgerRowBuilder};
use crate::domain::ledger::value_objects::{LedgerRow, PriorLedger, RowPatch};
use crate::domain::shared::{RowKey, Symbol};
use crate::domain::trade_capture::{
    ComboClassifier, ComboKind, ComboLeg, ExecutionReport, FillProjector, FillSide, OrderContract,
    TradeLeg,
};

/// Dollar exposure of one option contract per point of premium.
const OPTION_MULTIPLIER: Decimal = dec!(100);

/// Result of the trade-reconciliation pass.
#[derive(Debug, Clone)]
pub struct TradeReconciliation {
    /// Today's merged trade rows, in deterministic ticker order.
    pub rows: Vec<LedgerRow>,
    /// Human-readable diagnostics gathered along the way.
    pub warnings: Vec<String>,
}

/// Folds a day's execution reports into merged ledger rows against the
/// prior-day ledger.
///
/// One malformed order degrades into a diagnostic and an `UNKNOWN` or
/// `ERROR`-labeled row; it never aborts the pass.
#[derive(Debug, Clone, Copy)]
pub struct TradeReconciler {
    projector: FillProjector,
}

impl TradeReconciler {
    /// Create a reconciler for the given venue time zone.
    #[must_use]
    pub fn new(venue_tz: Tz) -> Self {
        Self {
            projector: FillProjector::new(venue_tz),
        }
    }

    /// Run the pass over all of today's execution reports.
    #[must_use]
    pub fn reconcile(
        &self,
        reports: &[ExecutionReport],
        prior: &PriorLedger,
        account_value: Decimal,
    ) -> TradeReconciliation {
        let mut builder = LedgerRowBuilder::new();
        let mut warnings = Vec::new();

        for report in reports {
            match &report.contract {
                OrderContract::Call { symbol } => {
                    self.apply_option_only(symbol, report, prior, account_value, &mut builder);
                }
                OrderContract::Stock { symbol } => {
                    self.apply_stock_only(
                        symbol,
                        report,
                        prior,
                        account_value,
                        &mut builder,
                        &mut warnings,
                    );
                }
                OrderContract::Combo { symbol, legs } => {
                    self.apply_combo(
                        symbol,
                        legs,
                        report,
                        prior,
                        account_value,
                        &mut builder,
                        &mut warnings,
                    );
                }
            }
        }

        TradeReconciliation {
            rows: builder.into_rows(),
            warnings,
        }
    }

    fn apply_option_only(
        &self,
        symbol: &Symbol,
        report: &ExecutionReport,
        prior: &PriorLedger,
        account_value: Decimal,
        builder: &mut LedgerRowBuilder,
    ) {
        for fill in &report.fills {
            let leg = self.projector.project(fill);
            let key = RowKey::primary(symbol.clone());
            let label = ActionResolver::option_only_label(leg.side, prior, symbol);
            let option_trade_price = if label.is_close_cc() {
                BasisResolver::closing_option_trade_price(prior, symbol, leg.price)
            } else {
                leg.price
            };
            let action = ActionResolver::composed_for_option_leg(builder.row(&key), label);
            debug!(
                ticker = %symbol,
                action = %action,
                price = %leg.price,
                size = %leg.quantity,
                "option fill"
            );
            builder.apply(
                key,
                RowPatch {
                    date: Some(leg.date),
                    time: Some(leg.time_text.clone()),
                    action: Some(action),
                    strike: leg.contract.strike(),
                    expiry: leg.contract.expiry(),
                    option_price: Some(leg.price),
                    option_trade_price: Some(option_trade_price),
                    account_balance: Some(account_value),
                    option_size_delta: Some(leg.quantity),
                    pnl_option_delta: Some(leg.realized_pnl),
                    commission_delta: Some(leg.commission),
                    ..RowPatch::default()
                },
            );
        }
    }

    fn apply_stock_only(
        &self,
        symbol: &Symbol,
        report: &ExecutionReport,
        prior: &PriorLedger,
        account_value: Decimal,
        builder: &mut LedgerRowBuilder,
        warnings: &mut Vec<String>,
    ) {
        for fill in &report.fills {
            let leg = self.projector.project(fill);
            let key = RowKey::primary(symbol.clone());
            let row_so_far = builder.row(&key);
            let cumulative = row_so_far
                .and_then(|row| row.underlying_size)
                .unwrap_or(Decimal::ZERO)
                + leg.quantity;
            let basis = BasisResolver::resolve_stock(
                leg.side,
                leg.price,
                cumulative,
                prior,
                symbol,
                row_so_far,
            );
            let mut action = ActionResolver::composed_for_stock_leg(row_so_far, leg.side);
            if basis.not_found {
                let message = format!(
                    "{symbol}: sale with no prior position and no matching buy today; basis recorded as zero"
                );
                warn!("{message}");
                warnings.push(message);
                action = action.error_prefixed();
            }
            debug!(
                ticker = %symbol,
                action = %action,
                price = %leg.price,
                shares = %leg.quantity,
                "stock fill"
            );
            builder.apply(
                key,
                RowPatch {
                    date: Some(leg.date),
                    time: Some(leg.time_text.clone()),
                    action: Some(action),
                    price: Some(leg.price),
                    trade_price: Some(basis.trade_price),
                    leg_price: Some(basis.leg_price),
                    account_balance: Some(account_value),
                    underlying_size_delta: Some(leg.quantity),
                    position_balance_delta: Some(leg.quantity * leg.price),
                    pnl_underlying_delta: Some(leg.realized_pnl),
                    pnl_underlying_leg_delta: Some(leg_pnl(&leg, basis.leg_price)),
                    commission_delta: Some(leg.commission),
                    ..RowPatch::default()
                },
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_combo(
        &self,
        symbol: &Symbol,
        legs: &[ComboLeg],
        report: &ExecutionReport,
        prior: &PriorLedger,
        account_value: Decimal,
        builder: &mut LedgerRowBuilder,
        warnings: &mut Vec<String>,
    ) {
        let kind = ComboClassifier::classify(legs);
        if kind == ComboKind::Unknown {
            let message = format!("{symbol}: unrecognized combo shape, legs logged as UNKNOWN");
            warn!("{message}");
            warnings.push(message);
        }

        for fill in &report.fills {
            let leg = self.projector.project(fill);
            if leg.contract.is_call() {
                self.apply_combo_option_leg(symbol, kind, &leg, prior, account_value, builder);
            } else {
                self.apply_combo_stock_leg(
                    symbol,
                    kind,
                    &leg,
                    prior,
                    account_value,
                    builder,
                    warnings,
                );
            }
        }
    }

    fn apply_combo_option_leg(
        &self,
        symbol: &Symbol,
        kind: ComboKind,
        leg: &TradeLeg,
        prior: &PriorLedger,
        account_value: Decimal,
        builder: &mut LedgerRowBuilder,
    ) {
        let key = if kind == ComboKind::Rollover && leg.side == FillSide::Sld {
            RowKey::rollover_write(symbol.clone())
        } else {
            RowKey::primary(symbol.clone())
        };
        let action = ActionResolver::combo_option_label(kind, leg.side);
        let option_trade_price = if kind == ComboKind::Rollover && leg.side == FillSide::Bot {
            // The closed call's entry price predates the rollover.
            BasisResolver::closing_option_trade_price(prior, symbol, leg.price)
        } else {
            leg.price
        };
        debug!(
            ticker = %key,
            action = %action,
            price = %leg.price,
            size = %leg.quantity,
            "combo option leg"
        );
        builder.apply(
            key,
            RowPatch {
                date: Some(leg.date),
                time: Some(leg.time_text.clone()),
                action: Some(action),
                strike: leg.contract.strike(),
                expiry: leg.contract.expiry(),
                option_price: Some(leg.price),
                option_trade_price: Some(option_trade_price),
                account_balance: Some(account_value),
                option_size_delta: Some(leg.quantity),
                pnl_option_delta: Some(leg.realized_pnl),
                position_balance_delta: Some(leg.price * leg.quantity * OPTION_MULTIPLIER),
                commission_delta: Some(leg.commission),
                ..RowPatch::default()
            },
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_combo_stock_leg(
        &self,
        symbol: &Symbol,
        kind: ComboKind,
        leg: &TradeLeg,
        prior: &PriorLedger,
        account_value: Decimal,
        builder: &mut LedgerRowBuilder,
        warnings: &mut Vec<String>,
    ) {
        let basis = BasisResolver::resolve_combo_stock(leg.side, leg.price, prior, symbol);
        let mut action = ActionResolver::combo_stock_label(kind);
        if basis.not_found {
            let message =
                format!("{symbol}: combo stock sale with no prior position; basis recorded as zero");
            warn!("{message}");
            warnings.push(message);
            action = action.error_prefixed();
        }
        debug!(
            ticker = %symbol,
            action = %action,
            price = %leg.price,
            shares = %leg.quantity,
            "combo stock leg"
        );
        builder.apply(
            RowKey::primary(symbol.clone()),
            RowPatch {
                date: Some(leg.date),
                time: Some(leg.time_text.clone()),
                action: Some(action),
                price: Some(leg.price),
                trade_price: Some(basis.trade_price),
                leg_price: Some(basis.leg_price),
                account_balance: Some(account_value),
                underlying_size_delta: Some(leg.quantity),
                position_balance_delta: Some(leg.quantity * leg.price),
                pnl_underlying_delta: Some(leg.realized_pnl),
                pnl_underlying_leg_delta: Some(leg_pnl(leg, basis.leg_price)),
                commission_delta: Some(leg.commission),
                ..RowPatch::default()
            },
        );
    }
}

/// Leg-level P&L against the reference price, on the unsigned share count.
fn leg_pnl(leg: &TradeLeg, leg_price: Decimal) -> Decimal {
    (leg.price - leg_price) * leg.quantity.abs()
}
