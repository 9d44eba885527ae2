//! Trading Calendar Port (Driven Port)

use async_trait::async_trait;
use chrono::NaiveDate;

/// Trading calendar error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CalendarError {
    /// The calendar source could not be read.
    #[error("Calendar error: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },
}

/// Port for the trading-holiday calendar.
#[async_trait]
pub trait TradingCalendarPort: Send + Sync {
    /// Whether the market trades on the given date.
    async fn is_trading_day(&self, date: NaiveDate) -> Result<bool, CalendarError>;
}
