//! Core types and constants

use crate::error::{Result, StockLensError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Price type (using f64 for precision)
pub type Price = f64;

/// Quantity/volume type
pub type Quantity = f64;

/// Symbol identifier for instruments
pub type Symbol = String;

/// Daily OHLCV bar with traded value
///
/// `turnover_value` is the total traded value for the period, used for the
/// per-period VWAP. Bars are immutable once ingested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Quantity,
    pub turnover_value: f64,
}

impl Bar {
    /// Create a new bar
    pub fn new(
        date: NaiveDate,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
        turnover_value: f64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            turnover_value,
        }
    }

    /// Typical price (HLC/3)
    pub fn typical_price(&self) -> Price {
        (self.high + self.low + self.close) / 3.0
    }

    /// Per-period VWAP: traded value over volume, falling back to the close
    /// for zero-volume periods.
    pub fn vwap(&self) -> Price {
        if self.volume > 0.0 {
            self.turnover_value / self.volume
        } else {
            self.close
        }
    }

    /// Check OHLC relationships
    pub fn is_valid(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.volume >= 0.0
    }
}

/// Bar aggregation timeframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// One bar per trading day
    Daily,
    /// One bar per ISO week, labelled with the week's Friday
    Weekly,
    /// One bar per calendar month, labelled with the month end
    Monthly,
}

impl Timeframe {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "daily" | "d" | "1d" => Ok(Timeframe::Daily),
            "weekly" | "w" | "1w" => Ok(Timeframe::Weekly),
            "monthly" | "m" | "1mo" => Ok(Timeframe::Monthly),
            _ => Err(StockLensError::ParseError(format!(
                "unknown timeframe: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Round to 2 decimal places, the precision used throughout report output.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
