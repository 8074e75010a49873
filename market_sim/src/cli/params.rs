use crate::{
    config::SimConfig,
    models::{bar_series::BarSeries, timeframe::Timeframe},
};

/// Applies command-line overrides on top of the resolved configuration.
pub fn apply_overrides(
    mut config: SimConfig,
    timeframe: Option<Timeframe>,
    seed: Option<u64>,
    tick_ms: Option<u64>,
) -> SimConfig {
    if let Some(tf) = timeframe {
        config.timeframe = tf;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    if let Some(ms) = tick_ms {
        config.updater.tick_ms = ms;
    }
    config
}

/// Renders a series as a fixed-width OHLCV table.
pub fn format_series_table(series: &BarSeries) -> String {
    let mut out = format!(
        "{:<20} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
        "TIME", "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME"
    );
    for bar in series.bars() {
        out.push_str(&format!(
            "{:<20} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.0}\n",
            bar.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    out
}
