#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use market_sim::{
    generator::{GeneratorConfig, SeriesGenerator},
    models::timeframe::Timeframe,
    projection::ChartPalette,
    random::{RandomSource, SeededSource},
    session::ChartSession,
    sink::MemorySink,
    updater::{LiveUpdater, UpdaterConfig},
};

/// Fixed "now" so timestamps are reproducible.
pub fn fixed_end() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Generator config whose walk and wicks are flat for a source stuck at 0.5.
pub fn neutral_config() -> GeneratorConfig {
    GeneratorConfig {
        bias: 0.5,
        ..GeneratorConfig::default()
    }
}

pub fn seeded_generator(seed: u64) -> SeriesGenerator<SeededSource> {
    SeriesGenerator::new(GeneratorConfig::default(), SeededSource::new(seed))
}

/// A session on the live view with a recording sink, not yet started.
pub fn open_session<R>(
    generator_source: R,
    updater_source: R,
    timeframe: Timeframe,
) -> (ChartSession<R, MemorySink>, MemorySink)
where
    R: RandomSource + 'static,
{
    let sink = MemorySink::new();
    let session = ChartSession::open(
        SeriesGenerator::new(GeneratorConfig::default(), generator_source),
        LiveUpdater::new(UpdaterConfig::default(), updater_source),
        sink.clone(),
        ChartPalette::default(),
        1650.0,
        timeframe,
    )
    .expect("open session");
    (session, sink)
}
