mod common;
use common::open_session;

use std::{io, time::Duration};

use market_sim::{
    Error, Result,
    config::SimConfig,
    generator::{GeneratorConfig, SeriesGenerator},
    models::timeframe::Timeframe,
    projection::{ChartFrame, ChartPalette, LastBarPatch},
    random::{FixedSource, SeededSource},
    session::ChartSession,
    sink::{ChartSink, MemorySink, SinkEvent},
    updater::{LiveUpdater, Ticker, UpdaterConfig},
};
use tokio::time::sleep;

const PERIOD: Duration = Duration::from_millis(400);

/// Accepts the initial draw, then fails every patch like a closed pipe.
struct ClosedSink {
    updates: usize,
}

impl ChartSink for ClosedSink {
    fn draw(&mut self, _frame: &ChartFrame) -> Result<()> {
        Ok(())
    }

    fn update_last(&mut self, _patch: &LastBarPatch, _ticker: &Ticker) -> Result<()> {
        self.updates += 1;
        Err(io::Error::from(io::ErrorKind::BrokenPipe).into())
    }
}

#[tokio::test(start_paused = true)]
async fn feed_ticks_once_per_period() {
    let (mut session, sink) =
        open_session(SeededSource::new(1), SeededSource::new(2), Timeframe::Live);
    session.start().unwrap();
    assert!(session.is_running());

    sleep(PERIOD * 3 + Duration::from_millis(10)).await;
    assert_eq!(session.tick_count().await, 3);
    assert_eq!(sink.update_count(), 3);

    assert!(session.stop().await);
    assert!(!session.is_running());
}

#[tokio::test(start_paused = true)]
async fn no_ticks_after_stop() {
    let (mut session, sink) =
        open_session(SeededSource::new(3), SeededSource::new(4), Timeframe::Live);
    session.start().unwrap();
    sleep(PERIOD * 2 + Duration::from_millis(10)).await;
    session.stop().await;

    let frozen = session.snapshot().await;
    let updates = sink.update_count();
    sleep(PERIOD * 10).await;

    assert_eq!(sink.update_count(), updates);
    assert_eq!(session.snapshot().await, frozen);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_session_cancels_the_timer() {
    let (mut session, sink) =
        open_session(SeededSource::new(5), SeededSource::new(6), Timeframe::Live);
    session.start().unwrap();
    sleep(PERIOD + Duration::from_millis(10)).await;
    let updates = sink.update_count();
    assert_eq!(updates, 1);

    drop(session);
    sleep(PERIOD * 10).await;
    assert_eq!(sink.update_count(), updates);
}

#[tokio::test(start_paused = true)]
async fn starting_twice_keeps_one_timer() {
    let (mut session, sink) =
        open_session(SeededSource::new(7), SeededSource::new(8), Timeframe::Live);
    session.start().unwrap();
    session.start().unwrap();
    sleep(PERIOD * 2 + Duration::from_millis(10)).await;
    assert_eq!(sink.update_count(), 2);
    session.close().await;
}

#[tokio::test(start_paused = true)]
async fn limited_feed_stops_by_itself() {
    let (mut session, sink) =
        open_session(SeededSource::new(9), SeededSource::new(10), Timeframe::OneDay);
    session.start_limited(4).unwrap();
    session.join().await.unwrap();

    assert!(!session.is_running());
    assert_eq!(session.tick_count().await, 4);
    assert_eq!(sink.update_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn live_ticks_leave_earlier_bars_alone() {
    let (mut session, _sink) =
        open_session(SeededSource::new(11), SeededSource::new(12), Timeframe::Live);
    let before = session.snapshot().await;

    session.start_limited(25).unwrap();
    session.join().await.unwrap();

    let after = session.snapshot().await;
    let n = after.len();
    assert_eq!(n, before.len());
    assert_eq!(&after.bars()[..n - 1], &before.bars()[..n - 1]);
    assert!(after.last().unwrap().is_bounded());
    assert_eq!(session.ticker().await.unwrap().price, after.last().unwrap().close);
}

#[tokio::test]
async fn timeframe_change_regenerates_and_redraws() {
    let (session, sink) = open_session(FixedSource(0.5), FixedSource(0.9), Timeframe::Live);
    session.tick_now().await.unwrap();

    session.select_timeframe(Timeframe::OneMonth).await.unwrap();
    assert_eq!(session.timeframe().await, Timeframe::OneMonth);

    let series = session.snapshot().await;
    assert_eq!(series.len(), 30);
    assert_eq!(session.ticker().await.unwrap().price, series.last().unwrap().close);

    let draws: Vec<usize> = sink
        .events()
        .iter()
        .filter_map(|e| match e {
            SinkEvent::Draw(frame) => Some(frame.len()),
            _ => None,
        })
        .collect();
    assert_eq!(draws, vec![60, 30]);
}

#[tokio::test]
async fn seeded_config_sessions_are_reproducible() {
    let config = SimConfig {
        seed: Some(77),
        timeframe: Timeframe::SevenDays,
        ..SimConfig::default()
    };
    let a = ChartSession::from_config(&config, MemorySink::new()).unwrap();
    let b = ChartSession::from_config(&config, MemorySink::new()).unwrap();

    let (sa, sb) = (a.snapshot().await, b.snapshot().await);
    assert_eq!(sa.len(), sb.len());
    for (x, y) in sa.bars().iter().zip(sb.bars()) {
        assert_eq!(
            (x.open, x.high, x.low, x.close, x.volume),
            (y.open, y.high, y.low, y.close, y.volume)
        );
    }
    assert_eq!(sa.symbol, "ETH-USD");

    let ta = a.tick_now().await.unwrap();
    let tb = b.tick_now().await.unwrap();
    assert_eq!(ta.delta, tb.delta);
}

#[test]
fn invalid_config_is_rejected_before_opening() {
    let config = SimConfig {
        start_price: 0.0,
        ..SimConfig::default()
    };
    assert!(matches!(
        ChartSession::from_config(&config, MemorySink::new()),
        Err(Error::Config(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn sink_failure_ends_the_feed() {
    let mut session = ChartSession::open(
        SeriesGenerator::new(GeneratorConfig::default(), SeededSource::new(13)),
        LiveUpdater::new(UpdaterConfig::default(), SeededSource::new(14)),
        ClosedSink { updates: 0 },
        ChartPalette::default(),
        1650.0,
        Timeframe::Live,
    )
    .unwrap();
    session.start().unwrap();

    match session.join().await {
        Err(Error::Sink(inner)) => assert!(matches!(*inner, Error::Io(_))),
        other => panic!("expected sink failure, got {other:?}"),
    }
    assert!(!session.is_running());
    assert_eq!(session.tick_count().await, 1);

    sleep(PERIOD * 5).await;
    assert_eq!(session.tick_count().await, 1);
}
