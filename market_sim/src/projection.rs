//! Read-only projection of a [`BarSeries`] into the parallel arrays a chart
//! renderer consumes.
//!
//! Nothing here mutates the series. An empty series projects to an empty
//! [`ChartFrame`], which renders as nothing.

use serde::{Deserialize, Serialize};

use crate::models::{bar::Bar, bar_series::BarSeries, timeframe::Timeframe};

/// Colours for rising and falling bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartPalette {
    pub up: String,
    pub down: String,
    pub volume_up: String,
    pub volume_down: String,
}

impl Default for ChartPalette {
    fn default() -> Self {
        Self {
            up: "#22c55e".to_string(),
            down: "#ef4444".to_string(),
            volume_up: "rgba(34,197,94,0.3)".to_string(),
            volume_down: "rgba(239,68,68,0.3)".to_string(),
        }
    }
}

impl ChartPalette {
    pub fn candle_color(&self, bar: &Bar) -> &str {
        if bar.is_up() { &self.up } else { &self.down }
    }

    pub fn volume_color(&self, bar: &Bar) -> &str {
        if bar.is_up() {
            &self.volume_up
        } else {
            &self.volume_down
        }
    }
}

/// How x-axis labels are derived from bars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelStyle {
    /// Position in the series, starting at 0.
    Index,
    /// Bar timestamp rendered with a `strftime` pattern.
    Time(String),
}

impl LabelStyle {
    pub fn for_timeframe(timeframe: Timeframe) -> Self {
        match timeframe.label_format() {
            Some(fmt) => LabelStyle::Time(fmt.to_string()),
            None => LabelStyle::Index,
        }
    }

    fn label(&self, index: usize, bar: &Bar) -> String {
        match self {
            LabelStyle::Index => index.to_string(),
            LabelStyle::Time(fmt) => bar.timestamp.format(fmt).to_string(),
        }
    }
}

/// Everything needed for a full redraw, index-aligned across fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartFrame {
    pub labels: Vec<String>,
    /// Candle body as `[open, close]`.
    pub candles: Vec<[f64; 2]>,
    /// Wick as `[high, low]`.
    pub wicks: Vec<[f64; 2]>,
    pub candle_colors: Vec<String>,
    pub volumes: Vec<f64>,
    pub volume_colors: Vec<String>,
}

impl ChartFrame {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The values at a single index, for in-place redraws of the last bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastBarPatch {
    pub index: usize,
    pub label: String,
    pub candle: [f64; 2],
    pub wick: [f64; 2],
    pub candle_color: String,
    pub volume: f64,
    pub volume_color: String,
}

pub fn project(series: &BarSeries, palette: &ChartPalette, style: &LabelStyle) -> ChartFrame {
    let bars = series.bars();
    ChartFrame {
        labels: bars
            .iter()
            .enumerate()
            .map(|(i, bar)| style.label(i, bar))
            .collect(),
        candles: bars.iter().map(|b| [b.open, b.close]).collect(),
        wicks: bars.iter().map(|b| [b.high, b.low]).collect(),
        candle_colors: candle_colors(series, palette),
        volumes: bars.iter().map(|b| b.volume).collect(),
        volume_colors: volume_colors(series, palette),
    }
}

/// Projects only the last bar; `None` for an empty series.
pub fn project_last(
    series: &BarSeries,
    palette: &ChartPalette,
    style: &LabelStyle,
) -> Option<LastBarPatch> {
    let index = series.last_index()?;
    let bar = series.last()?;
    Some(LastBarPatch {
        index,
        label: style.label(index, bar),
        candle: [bar.open, bar.close],
        wick: [bar.high, bar.low],
        candle_color: palette.candle_color(bar).to_string(),
        volume: bar.volume,
        volume_color: palette.volume_color(bar).to_string(),
    })
}

pub fn candle_colors(series: &BarSeries, palette: &ChartPalette) -> Vec<String> {
    series
        .bars()
        .iter()
        .map(|b| palette.candle_color(b).to_string())
        .collect()
}

pub fn volume_colors(series: &BarSeries, palette: &ChartPalette) -> Vec<String> {
    series
        .bars()
        .iter()
        .map(|b| palette.volume_color(b).to_string())
        .collect()
}
