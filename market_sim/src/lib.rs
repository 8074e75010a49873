//! Synthetic OHLCV market data for trading dashboards.
//!
//! - [`generator`] builds a random-walk price history.
//! - [`updater`] perturbs the in-progress bar on every live tick.
//! - [`projection`] maps a series to the arrays a chart renderer draws.
//! - [`session`] owns a series together with its live timer and sink.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod generator;
pub mod models;
pub mod projection;
pub mod random;
pub mod session;
pub mod sink;
pub mod updater;

pub use errors::{Error, Result};
pub use models::{bar::Bar, bar_series::BarSeries, timeframe::Timeframe};
