//! File-backed trading calendar.
//!
//! Holidays live in a newline-delimited text file of `YYYY-MM-DD` dates. An
//! optional second file lists early-close half days for callers that must
//! stay out of the market on them; the recording run itself treats half
//! days as trading days.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};

use crate::application::ports::{CalendarError, TradingCalendarPort};

/// Holiday-file implementation of `TradingCalendarPort`.
#[derive(Debug, Clone)]
pub struct HolidayFileCalendar {
    holidays_path: PathBuf,
    half_days_path: Option<PathBuf>,
}

impl HolidayFileCalendar {
    /// Create a calendar from a holiday file.
    #[must_use]
    pub fn new(holidays_path: impl Into<PathBuf>) -> Self {
        Self {
            holidays_path: holidays_path.into(),
            half_days_path: None,
        }
    }

    /// Also treat the dates in the given half-day file as non-trading.
    #[must_use]
    pub fn with_half_days(mut self, half_days_path: impl Into<PathBuf>) -> Self {
        self.half_days_path = Some(half_days_path.into());
        self
    }

    async fn file_lists(path: &Path, date: NaiveDate) -> Result<bool, CalendarError> {
        let body = tokio::fs::read_to_string(path).await.map_err(|err| {
            CalendarError::Unavailable {
                message: format!("cannot read '{}': {err}", path.display()),
            }
        })?;
        let needle = date.format("%Y-%m-%d").to_string();
        Ok(body.lines().any(|line| line.trim() == needle))
    }
}

#[async_trait]
impl TradingCalendarPort for HolidayFileCalendar {
    async fn is_trading_day(&self, date: NaiveDate) -> Result<bool, CalendarError> {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return Ok(false);
        }
        if Self::file_lists(&self.holidays_path, date).await? {
            return Ok(false);
        }
        if let Some(half_days) = &self.half_days_path {
            if Self::file_lists(half_days, date).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        path
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn weekdays_trade_unless_listed() {
        let dir = tempfile::tempdir().unwrap();
        let holidays = write_file(dir.path(), "holidays.txt", &["2023-07-04"]);
        let calendar = HolidayFileCalendar::new(holidays);

        // Independence Day 2023 (a Tuesday).
        assert!(!calendar.is_trading_day(date(2023, 7, 4)).await.unwrap());
        // The following Wednesday.
        assert!(calendar.is_trading_day(date(2023, 7, 5)).await.unwrap());
    }

    #[tokio::test]
    async fn weekends_never_trade() {
        let dir = tempfile::tempdir().unwrap();
        let holidays = write_file(dir.path(), "holidays.txt", &[]);
        let calendar = HolidayFileCalendar::new(holidays);

        // Saturday / Sunday.
        assert!(!calendar.is_trading_day(date(2023, 7, 22)).await.unwrap());
        assert!(!calendar.is_trading_day(date(2023, 7, 23)).await.unwrap());
    }

    #[tokio::test]
    async fn half_days_only_count_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let holidays = write_file(dir.path(), "holidays.txt", &[]);
        let half_days = write_file(dir.path(), "half_days.txt", &["2023-07-03"]);

        let without = HolidayFileCalendar::new(holidays.clone());
        assert!(without.is_trading_day(date(2023, 7, 3)).await.unwrap());

        let with = HolidayFileCalendar::new(holidays).with_half_days(half_days);
        assert!(!with.is_trading_day(date(2023, 7, 3)).await.unwrap());
    }

    #[tokio::test]
    async fn missing_holiday_file_is_an_error() {
        let calendar = HolidayFileCalendar::new("/nonexistent/holidays.txt");
        assert!(calendar.is_trading_day(date(2023, 7, 5)).await.is_err());
    }
}
