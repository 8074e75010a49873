//! An ordered, in-place mutable sequence of bars for one symbol.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::bar::Bar;

/// Represents a complete synthetic price history for a single symbol.
///
/// Bars are ordered by timestamp ascending and spaced exactly `interval`
/// apart. The series is replaced wholesale on a timeframe change and only its
/// last bar is mutated by live ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    /// The symbol this data represents (e.g., "ETH-USD").
    pub symbol: String,
    /// Spacing between consecutive bar timestamps.
    #[serde(with = "interval_millis")]
    pub interval: Duration,
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(symbol: impl Into<String>, interval: Duration, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            bars,
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Mutable access to the in-progress bar. Earlier bars are never exposed
    /// mutably.
    pub fn last_mut(&mut self) -> Option<&mut Bar> {
        self.bars.last_mut()
    }

    /// Index of the last bar, if any.
    pub fn last_index(&self) -> Option<usize> {
        self.bars.len().checked_sub(1)
    }

    /// `true` when timestamps strictly increase by exactly `interval`.
    pub fn is_evenly_spaced(&self) -> bool {
        let Ok(step) = chrono::Duration::from_std(self.interval) else {
            return false;
        };
        self.bars
            .windows(2)
            .all(|w| w[1].timestamp - w[0].timestamp == step)
    }
}

mod interval_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
