//! Projection of raw fills into normalized trade legs.

use chrono::NaiveDate;
use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::domain::shared::Contract;
use crate::domain::trade_capture::value_objects::{Fill, FillSide};

/// A fill normalized for ledger accumulation.
///
/// Quantity is signed (sales negative; options counted in contracts) and the
/// execution timestamp has been rendered into the venue-local date and time
/// strings used as ledger keys.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeLeg {
    /// Contract of the executed leg.
    pub contract: Contract,
    /// Execution side.
    pub side: FillSide,
    /// Signed share or contract count.
    pub quantity: Decimal,
    /// Execution price.
    pub price: Decimal,
    /// Commission for this fill.
    pub commission: Decimal,
    /// Realized P&L for this fill (absent on the wire collapses to zero).
    pub realized_pnl: Decimal,
    /// Venue-local execution date.
    pub date: NaiveDate,
    /// Venue-local execution time, `%H:%M`.
    pub time_text: String,
}

/// Converts fills into [`TradeLeg`]s for one venue time zone.
///
/// Execution timestamps arrive in UTC; ledger date/time keys are local to
/// the exchange.
#[derive(Debug, Clone, Copy)]
pub struct FillProjector {
    venue_tz: Tz,
}

impl FillProjector {
    /// Create a projector for the given venue zone.
    #[must_use]
    pub fn new(venue_tz: Tz) -> Self {
        Self { venue_tz }
    }

    /// Project one fill.
    #[must_use]
    pub fn project(&self, fill: &Fill) -> TradeLeg {
        let execution = &fill.execution;
        let local = execution.time.with_timezone(&self.venue_tz);
        TradeLeg {
            contract: fill.contract.clone(),
            side: execution.side,
            quantity: execution.side.sign() * execution.shares,
            price: execution.price,
            commission: fill.commission_report.commission,
            realized_pnl: fill.commission_report.realized_pnl_or_zero(),
            date: local.date_naive(),
            time_text: local.format("%H:%M").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade_capture::value_objects::{CommissionReport, Execution};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn projector() -> FillProjector {
        FillProjector::new(chrono_tz::America::New_York)
    }

    fn fill(side: FillSide, shares: Decimal) -> Fill {
        Fill {
            contract: Contract::stock("SPY"),
            execution: Execution {
                side,
                shares,
                price: dec!(450.10),
                // 20:45 UTC is 16:45 in New York during daylight saving.
                time: Utc.with_ymd_and_hms(2023, 7, 20, 20, 45, 0).unwrap(),
            },
            commission_report: CommissionReport {
                commission: dec!(1.00),
                realized_pnl: None,
            },
        }
    }

    #[test]
    fn sale_quantity_is_negative() {
        let leg = projector().project(&fill(FillSide::Sld, dec!(100)));
        assert_eq!(leg.quantity, dec!(-100));
        assert_eq!(leg.side, FillSide::Sld);
    }

    #[test]
    fn purchase_quantity_is_positive() {
        let leg = projector().project(&fill(FillSide::Bot, dec!(100)));
        assert_eq!(leg.quantity, dec!(100));
    }

    #[test]
    fn timestamps_convert_to_venue_zone() {
        let leg = projector().project(&fill(FillSide::Bot, dec!(100)));
        assert_eq!(leg.date.to_string(), "2023-07-20");
        assert_eq!(leg.time_text, "16:45");
    }

    #[test]
    fn late_utc_fills_land_on_the_venue_date() {
        let mut f = fill(FillSide::Bot, dec!(100));
        // 01:30 UTC on the 21st is still 21:30 on the 20th in New York.
        f.execution.time = Utc.with_ymd_and_hms(2023, 7, 21, 1, 30, 0).unwrap();
        let leg = projector().project(&f);
        assert_eq!(leg.date.to_string(), "2023-07-20");
        assert_eq!(leg.time_text, "21:30");
    }

    #[test]
    fn absent_realized_pnl_collapses_to_zero() {
        let leg = projector().project(&fill(FillSide::Bot, dec!(100)));
        assert_eq!(leg.realized_pnl, Decimal::ZERO);
        assert_eq!(leg.commission, dec!(1.00));
    }
}
