//! Canonical in-memory representation of a synthetic OHLCV bar.
//!
//! Generated series, the live updater and the chart projection all operate on
//! this struct. Prices are kept rounded to two decimals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rounds a price to two decimal places.
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A single OHLCV sample for one interval.
///
/// `high` and `low` always bound `open` and `close`, and `volume` is never
/// negative. [`Bar::is_bounded`] checks both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Start of the interval this bar covers (UTC).
    pub timestamp: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing (or, for the in-progress bar, latest) price.
    pub close: f64,

    /// Volume traded during the bar interval.
    pub volume: f64,
}

impl Bar {
    /// Builds a bar whose wick is widened as needed to bound `open` and `close`.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high: high.max(open).max(close),
            low: low.min(open).min(close),
            close,
            volume: volume.max(0.0),
        }
    }

    /// A flat bar where every price equals `price`.
    pub fn flat(timestamp: DateTime<Utc>, price: f64, volume: f64) -> Self {
        Self::new(timestamp, price, price, price, price, volume)
    }

    /// `true` when the bar closed at or above its open.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }

    /// Checks the high/low bounding and non-negative volume invariants.
    pub fn is_bounded(&self) -> bool {
        self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
            && self.volume >= 0.0
    }

    /// Moves the close to `price`, stretching high/low so they still bound it.
    pub fn set_close(&mut self, price: f64) {
        self.close = price;
        self.high = self.high.max(price);
        self.low = self.low.min(price);
    }
}
