//! Live perturbation of the in-progress bar.
//!
//! Each tick nudges the close of the last bar by a bounded random delta and
//! stretches its high/low to keep bounding it. Open, volume and timestamp stay
//! put, earlier bars are never touched, and no new bar is appended.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    errors::{Error, Result},
    generator::MIN_PRICE,
    models::{
        bar::{Bar, round_price},
        bar_series::BarSeries,
    },
    random::RandomSource,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdaterConfig {
    /// Width of the per-tick delta: `(u - 0.5) * step_scale`.
    pub step_scale: f64,
    /// Timer period in milliseconds.
    pub tick_ms: u64,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            step_scale: 5.0,
            tick_ms: 400,
        }
    }
}

impl UpdaterConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.step_scale.is_finite() || self.step_scale < 0.0 {
            return Err(Error::InvalidArgument(
                "step_scale must be finite and non-negative".into(),
            ));
        }
        if self.tick_ms == 0 {
            return Err(Error::InvalidArgument("tick_ms must be positive".into()));
        }
        Ok(())
    }
}

/// The price shown in the ticker and whether it moved up since the last tick.
///
/// `up` drives presentation colouring only; unchanged prices count as up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub price: f64,
    pub up: bool,
}

/// What a single tick changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickOutcome {
    /// Index of the mutated bar (always the last one).
    pub index: usize,
    pub bar: Bar,
    pub ticker: Ticker,
    pub delta: f64,
}

pub struct LiveUpdater<R> {
    config: UpdaterConfig,
    source: R,
    ticker: Option<Ticker>,
}

impl<R: RandomSource> LiveUpdater<R> {
    pub fn new(config: UpdaterConfig, source: R) -> Self {
        Self {
            config,
            source,
            ticker: None,
        }
    }

    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    pub fn ticker(&self) -> Option<Ticker> {
        self.ticker
    }

    /// Re-seeds the displayed price from the last close, e.g. after the
    /// series was regenerated. An empty series clears the ticker.
    pub fn reset_ticker(&mut self, series: &BarSeries) {
        self.ticker = series.last().map(|bar| Ticker {
            price: bar.close,
            up: true,
        });
    }

    /// Draws a random delta and applies it to the last bar.
    pub fn tick(&mut self, series: &mut BarSeries) -> Result<TickOutcome> {
        if series.is_empty() {
            return Err(empty_series());
        }
        let delta = (self.source.next_unit() - 0.5) * self.config.step_scale;
        self.apply_delta(series, delta)
    }

    /// Moves the last close by `delta`, rounded to cents and floored at
    /// [`MIN_PRICE`].
    pub fn apply_delta(&mut self, series: &mut BarSeries, delta: f64) -> Result<TickOutcome> {
        let index = series.last_index().ok_or_else(empty_series)?;
        let bar = series.last_mut().ok_or_else(empty_series)?;

        let previous_shown = self.ticker.map_or(bar.close, |t| t.price);
        let new_close = round_price(bar.close + delta).max(MIN_PRICE);
        bar.set_close(new_close);

        let ticker = Ticker {
            price: new_close,
            up: new_close >= previous_shown,
        };
        self.ticker = Some(ticker);

        debug!(index, delta, close = new_close, up = ticker.up, "tick");

        Ok(TickOutcome {
            index,
            bar: bar.clone(),
            ticker,
            delta,
        })
    }
}

fn empty_series() -> Error {
    Error::InvalidState("cannot tick an empty series".into())
}
