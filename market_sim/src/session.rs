//! An owned chart session: the series, the live updater, the presentation
//! sink and the recurring timer that drives them.
//!
//! The timer is a Tokio task spawned by [`ChartSession::start`]. While it runs
//! it is the only writer of the series, and it calls the sink synchronously
//! from inside each tick. A failing sink ends the feed, while a tick that
//! cannot be applied is logged and skipped. [`ChartSession::stop`] cancels the
//! timer and waits for it to finish. Dropping the session aborts it as well,
//! so no tick can outlive the session on any exit path.

use std::{sync::Arc, time::Duration};

use tokio::{
    runtime::Handle,
    sync::Mutex,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, error, info, warn};

use crate::{
    config::SimConfig,
    errors::{Error, Result},
    generator::SeriesGenerator,
    models::{bar_series::BarSeries, timeframe::Timeframe},
    projection::{ChartPalette, LabelStyle, project, project_last},
    random::{RandomSource, SeededSource},
    sink::ChartSink,
    updater::{LiveUpdater, TickOutcome, Ticker},
};

struct SessionState<R, S> {
    generator: SeriesGenerator<R>,
    updater: LiveUpdater<R>,
    sink: S,
    palette: ChartPalette,
    style: LabelStyle,
    timeframe: Timeframe,
    start_price: f64,
    series: BarSeries,
    ticks: u64,
}

impl<R: RandomSource, S: ChartSink> SessionState<R, S> {
    fn load(&mut self, timeframe: Timeframe) -> Result<()> {
        let series = self.generator.generate_for(timeframe, self.start_price)?;
        self.series = series;
        self.timeframe = timeframe;
        self.style = LabelStyle::for_timeframe(timeframe);
        self.updater.reset_ticker(&self.series);
        self.redraw()
    }

    fn redraw(&mut self) -> Result<()> {
        let frame = project(&self.series, &self.palette, &self.style);
        self.sink.draw(&frame)
    }

    /// Sink failures come back as [`Error::Sink`] so the timer can tell them
    /// apart from a tick that merely could not be applied.
    fn tick(&mut self) -> Result<TickOutcome> {
        let outcome = self.updater.tick(&mut self.series)?;
        self.ticks += 1;
        if let Some(patch) = project_last(&self.series, &self.palette, &self.style) {
            self.sink
                .update_last(&patch, &outcome.ticker)
                .map_err(|e| Error::Sink(Box::new(e)))?;
        }
        Ok(outcome)
    }
}

pub struct ChartSession<R, S> {
    state: Arc<Mutex<SessionState<R, S>>>,
    period: Duration,
    timer: Option<JoinHandle<Result<()>>>,
}

impl<S> ChartSession<SeededSource, S>
where
    S: ChartSink + 'static,
{
    /// Builds a session from configuration. With a configured seed both the
    /// generator and the live feed are reproducible.
    pub fn from_config(config: &SimConfig, sink: S) -> Result<Self> {
        config.validate()?;
        let (gen_source, tick_source) = match config.seed {
            Some(seed) => (SeededSource::new(seed), SeededSource::new(seed.wrapping_add(1))),
            None => (SeededSource::from_os(), SeededSource::from_os()),
        };
        let generator = SeriesGenerator::new(config.generator.clone(), gen_source)
            .with_symbol(config.symbol.clone());
        let updater = LiveUpdater::new(config.updater.clone(), tick_source);
        Self::open(
            generator,
            updater,
            sink,
            config.palette.clone(),
            config.start_price,
            config.timeframe,
        )
    }
}

impl<R, S> ChartSession<R, S>
where
    R: RandomSource + 'static,
    S: ChartSink + 'static,
{
    /// Generates the initial series for `timeframe` and draws it. The live
    /// feed is not started.
    pub fn open(
        generator: SeriesGenerator<R>,
        updater: LiveUpdater<R>,
        sink: S,
        palette: ChartPalette,
        start_price: f64,
        timeframe: Timeframe,
    ) -> Result<Self> {
        let period = updater.config().period();
        if period.is_zero() {
            return Err(Error::InvalidArgument("tick period must be positive".into()));
        }
        let mut state = SessionState {
            generator,
            updater,
            sink,
            palette,
            style: LabelStyle::for_timeframe(timeframe),
            timeframe,
            start_price,
            series: BarSeries::new("", Duration::ZERO, Vec::new()),
            ticks: 0,
        };
        state.load(timeframe)?;
        info!(%timeframe, bars = state.series.len(), "chart session opened");

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            period,
            timer: None,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Starts the live feed. Must be called from within a Tokio runtime.
    /// Starting an already running feed does nothing.
    pub fn start(&mut self) -> Result<()> {
        self.spawn_timer(None)
    }

    /// Like [`start`](Self::start), but the timer ends by itself after
    /// `ticks` ticks. Use [`join`](Self::join) to wait for it.
    pub fn start_limited(&mut self, ticks: u64) -> Result<()> {
        if ticks == 0 {
            return Ok(());
        }
        self.spawn_timer(Some(ticks))
    }

    fn spawn_timer(&mut self, limit: Option<u64>) -> Result<()> {
        if self.is_running() {
            debug!("live feed already running");
            return Ok(());
        }
        let handle = Handle::try_current()
            .map_err(|_| Error::InvalidState("live feed needs a Tokio runtime".into()))?;

        let state = Arc::clone(&self.state);
        let period = self.period;
        self.timer = Some(handle.spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of a Tokio interval fires immediately.
            timer.tick().await;
            let mut remaining = limit;
            loop {
                timer.tick().await;
                match state.lock().await.tick() {
                    Ok(_) => {}
                    Err(e @ Error::Sink(_)) => {
                        error!(error = %e, "live feed stopped by sink failure");
                        return Err(e);
                    }
                    Err(e) => warn!(error = %e, "skipping live tick"),
                }
                if let Some(left) = remaining.as_mut() {
                    *left -= 1;
                    if *left == 0 {
                        debug!("tick limit reached");
                        return Ok(());
                    }
                }
            }
        }));
        info!(period_ms = self.period.as_millis() as u64, ?limit, "live feed started");
        Ok(())
    }

    /// Waits for the feed to end: a limited feed running out, or any feed
    /// whose sink failed, which is returned as [`Error::Sink`]. Returns
    /// immediately when no feed is running.
    pub async fn join(&mut self) -> Result<()> {
        let Some(timer) = self.timer.as_mut() else {
            return Ok(());
        };
        let finished = timer.await;
        self.timer = None;
        match finished {
            Ok(feed) => feed,
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => Err(Error::InvalidState(format!("live feed task failed: {e}"))),
        }
    }

    /// Cancels the live feed and waits until the timer task has finished.
    /// Returns `false` if it was not running.
    pub async fn stop(&mut self) -> bool {
        let Some(timer) = self.timer.take() else {
            return false;
        };
        timer.abort();
        // Cancellation is the expected outcome here.
        let _ = timer.await;
        info!("live feed stopped");
        true
    }

    /// Stops the feed and tears the session down.
    pub async fn close(mut self) {
        self.stop().await;
        debug!("chart session closed");
    }

    /// Replaces the series with a fresh one for `timeframe` and redraws.
    pub async fn select_timeframe(&self, timeframe: Timeframe) -> Result<()> {
        let mut state = self.state.lock().await;
        state.load(timeframe)?;
        info!(%timeframe, bars = state.series.len(), "timeframe changed");
        Ok(())
    }

    /// Runs a single tick immediately, outside the timer.
    pub async fn tick_now(&self) -> Result<TickOutcome> {
        self.state.lock().await.tick()
    }

    pub async fn snapshot(&self) -> BarSeries {
        self.state.lock().await.series.clone()
    }

    pub async fn ticker(&self) -> Option<Ticker> {
        self.state.lock().await.updater.ticker()
    }

    pub async fn timeframe(&self) -> Timeframe {
        self.state.lock().await.timeframe
    }

    /// Ticks applied since the session was opened.
    pub async fn tick_count(&self) -> u64 {
        self.state.lock().await.ticks
    }
}

impl<R, S> Drop for ChartSession<R, S> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
