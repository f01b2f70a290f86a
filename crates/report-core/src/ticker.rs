//! Ticker normalization and the per-session ticker registry

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Minimum length, in characters, of a normalized ticker
pub const MIN_TICKER_LEN: usize = 3;

/// A normalized stock symbol: trimmed, uppercased, at least three characters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker(String);

impl Ticker {
    /// Normalize raw user input into a ticker
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.chars().count() < MIN_TICKER_LEN {
            return Err(ValidationError::TooShort { normalized });
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Insertion-ordered list of tickers chosen during a session.
///
/// Only successful submissions mutate it, and it is never cleared: a failed
/// run leaves it intact so the user can simply trigger again. Duplicate
/// submissions are kept, so the same symbol can be queried twice.
#[derive(Debug, Clone, Default)]
pub struct TickerRegistry {
    tickers: Vec<Ticker>,
}

impl TickerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `raw` and append it on success.
    ///
    /// On failure the registry is left unchanged.
    pub fn submit(&mut self, raw: &str) -> Result<Ticker, ValidationError> {
        let ticker = Ticker::parse(raw)?;
        self.tickers.push(ticker.clone());
        Ok(ticker)
    }

    /// Read-only snapshot in registration order
    pub fn list(&self) -> &[Ticker] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}
