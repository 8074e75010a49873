//! Timeframe selection table.
//!
//! Each selectable [`Timeframe`] maps to a fixed bar count and bar interval
//! used when the series is regenerated. Labels parse and display in the
//! dashboard's form (`"1D"`, `"7D"`, `"1M"`, ...).
//!
//! ```
//! use market_sim::models::timeframe::Timeframe;
//!
//! let tf: Timeframe = "7D".parse().unwrap();
//! assert_eq!(tf.bar_count(), 42);
//! assert_eq!(tf.to_string(), "7D");
//! ```

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::errors::Error;

const MINUTE: u64 = 60_000;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timeframe {
    /// Initial streaming view: 60 one-minute bars labelled by tick index.
    #[default]
    Live,
    OneDay,
    SevenDays,
    OneMonth,
    ThreeMonths,
    OneYear,
}

impl Timeframe {
    /// Number of bars generated for this selection.
    pub const fn bar_count(&self) -> usize {
        match self {
            Timeframe::Live => 60,
            Timeframe::OneDay => 24,
            Timeframe::SevenDays => 42,
            Timeframe::OneMonth => 30,
            Timeframe::ThreeMonths => 90,
            Timeframe::OneYear => 52,
        }
    }

    /// Spacing between generated bars, in milliseconds.
    pub const fn interval_millis(&self) -> u64 {
        match self {
            Timeframe::Live => MINUTE,
            Timeframe::OneDay => HOUR,
            Timeframe::SevenDays => 4 * HOUR,
            Timeframe::OneMonth | Timeframe::ThreeMonths => DAY,
            Timeframe::OneYear => 7 * DAY,
        }
    }

    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_millis())
    }

    /// `strftime` pattern for axis labels, or `None` for index labels.
    pub const fn label_format(&self) -> Option<&'static str> {
        match self {
            Timeframe::Live => None,
            Timeframe::OneDay => Some("%H:%M"),
            Timeframe::SevenDays => Some("%m-%d %H:%M"),
            Timeframe::OneMonth | Timeframe::ThreeMonths => Some("%b %d"),
            Timeframe::OneYear => Some("%Y-%m-%d"),
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Timeframe::Live => "LIVE",
            Timeframe::OneDay => "1D",
            Timeframe::SevenDays => "7D",
            Timeframe::OneMonth => "1M",
            Timeframe::ThreeMonths => "3M",
            Timeframe::OneYear => "1Y",
        }
    }

    /// All selectable timeframes in display order.
    pub const fn all() -> &'static [Timeframe] {
        &[
            Timeframe::Live,
            Timeframe::OneDay,
            Timeframe::SevenDays,
            Timeframe::OneMonth,
            Timeframe::ThreeMonths,
            Timeframe::OneYear,
        ]
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Timeframe {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "1M" is one month; minutes are never selectable here.
        let tf = match s.trim() {
            "LIVE" | "live" | "Live" => Timeframe::Live,
            "1D" | "1d" => Timeframe::OneDay,
            "7D" | "7d" | "1W" | "1w" => Timeframe::SevenDays,
            "1M" => Timeframe::OneMonth,
            "3M" => Timeframe::ThreeMonths,
            "1Y" | "1y" => Timeframe::OneYear,
            other => {
                return Err(Error::InvalidArgument(format!(
                    "unknown timeframe {other:?}, expected one of LIVE, 1D, 7D, 1M, 3M, 1Y"
                )));
            }
        };
        Ok(tf)
    }
}

impl TryFrom<String> for Timeframe {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.label().to_string()
    }
}
