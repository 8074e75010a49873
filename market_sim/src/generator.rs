//! Synthetic OHLCV series generation.
//!
//! A [`SeriesGenerator`] walks a price from a starting value, one bar at a
//! time. Each bar opens at the previous close and closes at
//! `open + (u - bias) * volatility`. The wick extends past the body by up to
//! `wick_range` on each side, and volume is drawn between a floor and a
//! ceiling. Draw order per bar is: close step, upper wick, lower wick, volume.
//!
//! Bars are spaced exactly `interval` apart with the last one stamped at the
//! requested end time (usually "now").

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    errors::{Error, Result},
    models::{
        bar::{Bar, round_price},
        bar_series::BarSeries,
        timeframe::Timeframe,
    },
    random::RandomSource,
};

/// Prices never walk below one cent.
pub const MIN_PRICE: f64 = 0.01;

/// Tunables for the random walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Subtracted from each uniform draw; below 0.5 the walk drifts upward.
    pub bias: f64,
    /// Scale of the per-bar close step.
    pub volatility: f64,
    /// Maximum wick length beyond the candle body.
    pub wick_range: f64,
    pub volume_floor: f64,
    pub volume_ceiling: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            bias: 0.48,
            volatility: 25.0,
            wick_range: 10.0,
            volume_floor: 2000.0,
            volume_ceiling: 7000.0,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("bias", self.bias),
            ("volatility", self.volatility),
            ("wick_range", self.wick_range),
            ("volume_floor", self.volume_floor),
            ("volume_ceiling", self.volume_ceiling),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(Error::InvalidArgument(format!("{name} must be finite")));
            }
        }
        if self.volatility < 0.0 || self.wick_range < 0.0 {
            return Err(Error::InvalidArgument(
                "volatility and wick_range must be non-negative".into(),
            ));
        }
        if self.volume_floor < 0.0 || self.volume_floor > self.volume_ceiling {
            return Err(Error::InvalidArgument(format!(
                "volume range [{}, {}] is invalid",
                self.volume_floor, self.volume_ceiling
            )));
        }
        Ok(())
    }
}

/// Produces fresh synthetic [`BarSeries`] from an injected [`RandomSource`].
pub struct SeriesGenerator<R> {
    config: GeneratorConfig,
    source: R,
    symbol: String,
}

impl<R: RandomSource> SeriesGenerator<R> {
    pub fn new(config: GeneratorConfig, source: R) -> Self {
        Self {
            config,
            source,
            symbol: "SIM".to_string(),
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Generates `bar_count` bars ending at the current time.
    pub fn generate(
        &mut self,
        bar_count: usize,
        start_price: f64,
        interval_millis: u64,
    ) -> Result<BarSeries> {
        self.generate_at(bar_count, start_price, interval_millis, Utc::now())
    }

    /// Generates the bar count and interval a [`Timeframe`] selection maps to.
    pub fn generate_for(&mut self, timeframe: Timeframe, start_price: f64) -> Result<BarSeries> {
        self.generate(timeframe.bar_count(), start_price, timeframe.interval_millis())
    }

    /// Like [`generate`](Self::generate), with the last bar stamped at `end`.
    pub fn generate_at(
        &mut self,
        bar_count: usize,
        start_price: f64,
        interval_millis: u64,
        end: DateTime<Utc>,
    ) -> Result<BarSeries> {
        if bar_count == 0 {
            return Err(Error::InvalidArgument("bar count must be positive".into()));
        }
        if !start_price.is_finite() || start_price <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "start price must be positive, got {start_price}"
            )));
        }
        if interval_millis == 0 {
            return Err(Error::InvalidArgument("interval must be positive".into()));
        }
        self.config.validate()?;

        let timestamps = timestamps_ending_at(end, bar_count, interval_millis)?;
        let mut bars = Vec::with_capacity(bar_count);
        let mut price = round_price(start_price).max(MIN_PRICE);

        for timestamp in timestamps {
            let bar = self.next_bar(timestamp, price);
            price = bar.close;
            bars.push(bar);
        }

        debug!(
            symbol = %self.symbol,
            bars = bars.len(),
            interval_ms = interval_millis,
            last_close = price,
            "generated synthetic series"
        );

        Ok(BarSeries::new(
            self.symbol.clone(),
            std::time::Duration::from_millis(interval_millis),
            bars,
        ))
    }

    fn next_bar(&mut self, timestamp: DateTime<Utc>, open: f64) -> Bar {
        let cfg = &self.config;

        let step = (self.source.next_unit() - cfg.bias) * cfg.volatility;
        let close = round_price(open + step).max(MIN_PRICE);

        // |2u - 1| is uniform on [0, 1] like u itself, and zero at u = 0.5.
        let upper = (2.0 * self.source.next_unit() - 1.0).abs() * cfg.wick_range;
        let lower = (2.0 * self.source.next_unit() - 1.0).abs() * cfg.wick_range;
        let high = round_price(open.max(close) + upper);
        let low = round_price(open.min(close) - lower).max(MIN_PRICE);

        let u = self.source.next_unit();
        let volume = cfg.volume_floor + u * (cfg.volume_ceiling - cfg.volume_floor);

        // Bar::new re-clamps high/low so rounding can never break the bounds.
        Bar::new(timestamp, open, high, low, close, round_price(volume))
    }
}

fn timestamps_ending_at(
    end: DateTime<Utc>,
    bar_count: usize,
    interval_millis: u64,
) -> Result<Vec<DateTime<Utc>>> {
    let out_of_range =
        || Error::InvalidArgument("series does not fit in the representable time range".into());

    let step = i64::try_from(interval_millis).map_err(|_| out_of_range())?;
    (0..bar_count)
        .rev()
        .map(|back| {
            let back = i64::try_from(back).map_err(|_| out_of_range())?;
            step.checked_mul(back)
                .and_then(TimeDelta::try_milliseconds)
                .and_then(|offset| end.checked_sub_signed(offset))
                .ok_or_else(out_of_range)
        })
        .collect()
}
