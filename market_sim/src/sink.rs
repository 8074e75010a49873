//! The presentation-layer seam.
//!
//! A [`ChartSink`] receives full frames when a series is (re)loaded and
//! single-index patches on every live tick. Patches must be applied in place
//! without animation; a sink never has to re-read the whole series per tick.

use std::{
    io::Write,
    sync::{Arc, Mutex, PoisonError},
};

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    errors::Result,
    projection::{ChartFrame, LastBarPatch},
    updater::Ticker,
};

pub trait ChartSink: Send {
    /// Full redraw. Called with an empty frame when there is nothing to show.
    fn draw(&mut self, frame: &ChartFrame) -> Result<()>;

    /// In-place redraw of the last index only.
    fn update_last(&mut self, patch: &LastBarPatch, ticker: &Ticker) -> Result<()>;
}

impl<T: ChartSink + ?Sized> ChartSink for Box<T> {
    fn draw(&mut self, frame: &ChartFrame) -> Result<()> {
        (**self).draw(frame)
    }

    fn update_last(&mut self, patch: &LastBarPatch, ticker: &Ticker) -> Result<()> {
        (**self).update_last(patch, ticker)
    }
}

/// One redraw request, as recorded or serialized by the bundled sinks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SinkEvent {
    Draw(ChartFrame),
    Update { patch: LastBarPatch, ticker: Ticker },
}

/// Logs redraws through `tracing`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl ChartSink for TracingSink {
    fn draw(&mut self, frame: &ChartFrame) -> Result<()> {
        if frame.is_empty() {
            info!("chart cleared");
            return Ok(());
        }
        info!(bars = frame.len(), "chart drawn");
        Ok(())
    }

    fn update_last(&mut self, patch: &LastBarPatch, ticker: &Ticker) -> Result<()> {
        debug!(
            index = patch.index,
            open = patch.candle[0],
            close = patch.candle[1],
            high = patch.wick[0],
            low = patch.wick[1],
            price = ticker.price,
            up = ticker.up,
            "last bar updated"
        );
        Ok(())
    }
}

/// Writes one JSON object per redraw, newline separated.
pub struct JsonLinesSink<W> {
    out: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &SinkEvent) -> Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> ChartSink for JsonLinesSink<W> {
    fn draw(&mut self, frame: &ChartFrame) -> Result<()> {
        self.emit(&SinkEvent::Draw(frame.clone()))
    }

    fn update_last(&mut self, patch: &LastBarPatch, ticker: &Ticker) -> Result<()> {
        self.emit(&SinkEvent::Update {
            patch: patch.clone(),
            ticker: *ticker,
        })
    }
}

/// Keeps every redraw in memory. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<SinkEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, SinkEvent::Update { .. }))
            .count()
    }

    fn push(&self, event: SinkEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl ChartSink for MemorySink {
    fn draw(&mut self, frame: &ChartFrame) -> Result<()> {
        self.push(SinkEvent::Draw(frame.clone()));
        Ok(())
    }

    fn update_last(&mut self, patch: &LastBarPatch, ticker: &Ticker) -> Result<()> {
        self.push(SinkEvent::Update {
            patch: patch.clone(),
            ticker: *ticker,
        });
        Ok(())
    }
}
