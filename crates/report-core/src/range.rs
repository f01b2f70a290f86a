//! Calendar date window requested from the market-data provider

use chrono::{Days, Local, NaiveDate};

use crate::error::ConfigError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive `(start, end)` pair of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The `days` full days before `today`, today excluded
    pub fn trailing(today: NaiveDate, days: u32) -> Result<Self, ConfigError> {
        if days == 0 {
            return Err(ConfigError::ZeroLookback);
        }
        let start = today.checked_sub_days(Days::new(u64::from(days)));
        let end = today.checked_sub_days(Days::new(1));
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => Err(ConfigError::ZeroLookback),
        }
    }

    /// Trailing window ending yesterday in the local timezone
    pub fn recent(days: u32) -> Result<Self, ConfigError> {
        Self::trailing(Local::now().date_naive(), days)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// `start` as sent to the provider (`YYYY-MM-DD`)
    pub fn start_param(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// `end` as sent to the provider (`YYYY-MM-DD`)
    pub fn end_param(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}
