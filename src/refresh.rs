//! The refresh loop: `Idle -> Fetching -> Rendering -> Idle`.
//!
//! Fetches for one tick run on a worker thread so the window keeps
//! repainting; the batch comes back over a channel and is applied on the
//! owning thread before anything is drawn. A failed fetch only skips that
//! asset for the tick. A render failure ends the loop.

use crate::asset::AssetState;
use crate::axes_util::format_value;
use crate::config::{MonitorConfig, Ticker};
use crate::error::{FetchError, MonitorError};
use crate::fetch::{select_interval, MarketData, Sample};
use crate::layout::{compute_bounds, AxisBounds, SubplotGrid};
use crate::scene::{RenderSurface, ValueLabel};
use crate::tape::TickerTape;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Idle,
    Fetching,
    Rendering,
}

/// Result of one asset's fetch, tagged with its slot.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub index: usize,
    pub result: Result<Vec<Sample>, FetchError>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Asset names redrawn this tick.
    pub updated: Vec<String>,
    /// Asset names left as they were.
    pub skipped: Vec<String>,
    pub failures: Vec<FetchError>,
}

pub struct RefreshLoop<S: RenderSurface> {
    fetcher: Arc<dyn MarketData>,
    assets: Vec<AssetState>,
    bounds: Vec<Option<AxisBounds>>,
    fresh: Vec<bool>,
    tape: TickerTape,
    grid: SubplotGrid,
    surface: S,
    phase: LoopPhase,
    pending: Option<Receiver<Vec<FetchOutcome>>>,
    last_tick: Option<Instant>,
    refresh_interval: Duration,
    bar_interval: &'static str,
    period: String,
    padding: f64,
    ticks: u64,
}

impl<S: RenderSurface> RefreshLoop<S> {
    pub fn new(config: &MonitorConfig, fetcher: Arc<dyn MarketData>, surface: S) -> Self {
        let count = config.assets.len();
        let mut this = Self {
            fetcher,
            assets: config.assets.iter().cloned().map(AssetState::new).collect(),
            bounds: vec![None; count],
            fresh: vec![false; count],
            tape: TickerTape::new(config.tape_speed),
            grid: SubplotGrid::new(count),
            surface,
            phase: LoopPhase::Idle,
            pending: None,
            last_tick: None,
            refresh_interval: config.refresh_interval(),
            bar_interval: select_interval(config.refresh_interval_secs),
            period: config.lookback_period.clone(),
            padding: config.padding_fraction,
            ticks: 0,
        };
        this.advance_tape();
        this
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn assets(&self) -> &[AssetState] {
        &self.assets
    }

    pub fn bounds(&self) -> &[Option<AxisBounds>] {
        &self.bounds
    }

    pub fn tape(&self) -> &TickerTape {
        &self.tape
    }

    pub fn grid(&self) -> &SubplotGrid {
        &self.grid
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.phase == LoopPhase::Idle
            && self
                .last_tick
                .map_or(true, |last| now.saturating_duration_since(last) >= self.refresh_interval)
    }

    /// Rendered width of one copy of the tape text.
    pub fn set_tape_width(&mut self, width: f32) {
        self.tape.set_wrap_width(width);
    }

    /// Per-frame work that does not depend on new data.
    pub fn on_frame(&mut self, dt: f32, clock: &str) {
        self.tape.scroll(dt);
        self.surface.set_clock(clock);
    }

    /// Non-blocking step for the GUI thread. Starts a fetch when due and
    /// applies a finished batch. Returns the report of a completed tick.
    pub fn poll(&mut self, now: Instant) -> Result<Option<TickReport>, MonitorError> {
        if self.is_due(now) {
            self.begin_fetch(now);
        }
        if self.phase != LoopPhase::Fetching {
            return Ok(None);
        }
        let batch = match self.pending.as_ref().map(Receiver::try_recv) {
            Some(Ok(batch)) => batch,
            Some(Err(TryRecvError::Empty)) => return Ok(None),
            Some(Err(TryRecvError::Disconnected)) | None => {
                tracing::error!("fetch worker lost; skipping tick");
                Vec::new()
            }
        };
        self.pending = None;
        self.complete(batch).map(Some)
    }

    /// Runs one full tick, blocking until every fetch is back.
    pub fn tick(&mut self) -> Result<TickReport, MonitorError> {
        self.begin_fetch(Instant::now());
        let batch = match self.pending.take().map(|rx| rx.recv()) {
            Some(Ok(batch)) => batch,
            _ => {
                tracing::error!("fetch worker lost; skipping tick");
                Vec::new()
            }
        };
        self.complete(batch)
    }

    fn begin_fetch(&mut self, now: Instant) {
        self.phase = LoopPhase::Fetching;
        self.last_tick = Some(now);

        let (tx, rx) = mpsc::channel();
        let fetcher = Arc::clone(&self.fetcher);
        let tickers: Vec<Ticker> = self.assets.iter().map(|a| a.ticker.clone()).collect();
        let interval = self.bar_interval;
        let period = self.period.clone();

        tracing::debug!(assets = tickers.len(), interval, period = %period, "fetching market data");
        let spawned = thread::Builder::new()
            .name("market-fetch".into())
            .spawn(move || {
                let batch: Vec<FetchOutcome> = tickers
                    .iter()
                    .enumerate()
                    .map(|(index, ticker)| FetchOutcome {
                        index,
                        result: fetcher.fetch(ticker, interval, &period),
                    })
                    .collect();
                // receiver gone means the loop shut down
                let _ = tx.send(batch);
            });

        match spawned {
            Ok(_) => self.pending = Some(rx),
            Err(e) => {
                tracing::error!(error = %e, "cannot spawn fetch worker");
                self.pending = None;
            }
        }
    }

    /// Fetching -> Rendering -> Idle for a delivered batch.
    fn complete(&mut self, batch: Vec<FetchOutcome>) -> Result<TickReport, MonitorError> {
        self.phase = LoopPhase::Rendering;
        self.ticks += 1;
        self.fresh.iter_mut().for_each(|f| *f = false);

        let mut report = TickReport::default();
        for outcome in batch {
            let Some(asset) = self.assets.get_mut(outcome.index) else {
                continue;
            };
            match outcome.result {
                Ok(samples) => {
                    if !asset.update(samples) {
                        let err = FetchError::unavailable(&asset.ticker.symbol, "empty series");
                        tracing::warn!(asset = %asset.ticker.name, error = %err, "skipping asset");
                        report.failures.push(err);
                        continue;
                    }
                    if let Some((min, max)) = asset.range() {
                        let slot = &mut self.bounds[outcome.index];
                        *slot = Some(compute_bounds(*slot, min, max, self.padding));
                    }
                    self.fresh[outcome.index] = true;
                }
                Err(err) => {
                    tracing::warn!(asset = %asset.ticker.name, error = %err, "skipping asset");
                    report.failures.push(err);
                }
            }
        }

        for index in 0..self.assets.len() {
            if self.fresh[index] {
                self.redraw(index)?;
                report.updated.push(self.assets[index].ticker.name.clone());
            } else {
                report.skipped.push(self.assets[index].ticker.name.clone());
            }
        }
        self.advance_tape();
        self.surface.advance_frame();
        self.phase = LoopPhase::Idle;

        tracing::info!(
            tick = self.ticks,
            updated = report.updated.len(),
            skipped = report.skipped.len(),
            "refresh complete"
        );
        Ok(report)
    }

    fn redraw(&mut self, index: usize) -> Result<(), MonitorError> {
        let asset = &self.assets[index];
        let Some(last) = asset.samples.last().copied() else {
            return Ok(());
        };
        self.surface.set_line_data(index, &asset.samples)?;
        if let Some(bounds) = self.bounds[index] {
            self.surface.set_axis_bounds(index, bounds)?;
        }
        self.surface.draw_label(
            index,
            ValueLabel {
                time: last.time,
                price: last.price,
                text: format_value(last.price),
            },
        )?;
        Ok(())
    }

    fn advance_tape(&mut self) {
        let fresh = &self.fresh;
        self.tape.advance(self.assets.iter().enumerate().map(|(i, a)| {
            let quote = if fresh[i] { a.quote() } else { None };
            (a.ticker.name.as_str(), quote)
        }));
        let text = self.tape.text();
        self.surface.set_tape(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed(HashMap<String, Vec<f64>>);

    impl MarketData for Fixed {
        fn fetch(&self, ticker: &Ticker, _: &str, _: &str) -> Result<Vec<Sample>, FetchError> {
            match self.0.get(&ticker.symbol) {
                Some(prices) => Ok(prices
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| Sample::new(i as i64 * 60_000, p))
                    .collect()),
                None => Err(FetchError::network(&ticker.symbol, "connection refused")),
            }
        }
    }

    fn config(symbols: &[&str]) -> MonitorConfig {
        MonitorConfig {
            assets: symbols.iter().map(|s| Ticker::new(s, s)).collect(),
            ..MonitorConfig::default()
        }
    }

    fn looped(symbols: &[&str], data: &[(&str, Vec<f64>)]) -> RefreshLoop<Scene> {
        let fetcher = Fixed(data.iter().map(|(s, p)| (s.to_string(), p.clone())).collect());
        RefreshLoop::new(&config(symbols), Arc::new(fetcher), Scene::new(symbols.iter().copied()))
    }

    #[test]
    fn tape_starts_with_placeholders() {
        let rl = looped(&["AAA", "BBB"], &[]);
        assert_eq!(rl.surface().tape, "AAA --   |   BBB --");
        assert_eq!(rl.phase(), LoopPhase::Idle);
        assert_eq!(rl.grid().len(), 2);
    }

    #[test]
    fn tick_updates_and_draws() {
        let mut rl = looped(&["AAA"], &[("AAA", vec![100.0, 110.0])]);
        let report = rl.tick().unwrap();
        assert_eq!(report.updated, ["AAA"]);
        assert!(report.skipped.is_empty());
        assert_eq!(rl.phase(), LoopPhase::Idle);

        let chart = &rl.surface().charts[0];
        assert_eq!(chart.samples.len(), 2);
        assert_eq!(chart.bounds, rl.bounds()[0]);
        assert_eq!(chart.label.as_ref().unwrap().text, "110.00");
        assert_eq!(rl.surface().frame, 1);
        assert!(rl.surface().tape.starts_with("AAA 110.00 ▲"));
    }

    #[test]
    fn network_failure_keeps_previous_chart() {
        let mut rl = looped(&["AAA", "BBB"], &[("AAA", vec![1.0, 2.0])]);
        let report = rl.tick().unwrap();
        assert_eq!(report.skipped, ["BBB"]);
        assert!(matches!(report.failures[0], FetchError::Network { .. }));
        assert!(rl.surface().charts[1].samples.is_empty());
        assert_eq!(rl.bounds()[1], None);
        assert!(rl.surface().tape.ends_with("BBB --"));
    }

    #[test]
    fn due_only_after_interval() {
        let mut rl = looped(&["AAA"], &[("AAA", vec![1.0])]);
        let start = Instant::now();
        assert!(rl.is_due(start));
        rl.tick().unwrap();
        let last = rl.last_tick.unwrap();
        assert!(!rl.is_due(last + Duration::from_secs(59)));
        assert!(rl.is_due(last + Duration::from_secs(60)));
    }

    #[test]
    fn poll_completes_tick_eventually() {
        let mut rl = looped(&["AAA"], &[("AAA", vec![5.0, 6.0])]);
        let now = Instant::now();
        let mut report = None;
        for _ in 0..500 {
            if let Some(r) = rl.poll(now).unwrap() {
                report = Some(r);
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(report.unwrap().updated, ["AAA"]);
        assert_eq!(rl.phase(), LoopPhase::Idle);
        // same instant: not due again
        assert_eq!(rl.poll(now).unwrap(), None);
        assert_eq!(rl.phase(), LoopPhase::Idle);
    }

    #[test]
    fn on_frame_sets_clock_and_scrolls() {
        let mut rl = looped(&["AAA"], &[]);
        rl.on_frame(1.0, "2026-10-16 09:30:00 AM");
        assert_eq!(rl.surface().clock, "2026-10-16 09:30:00 AM");
        assert_eq!(rl.tape().offset_within(1000.0), 60.0);
    }

    /// Answers the first `healthy` calls, then panics inside the worker.
    struct DiesAfter {
        healthy: usize,
        calls: AtomicUsize,
    }

    impl MarketData for DiesAfter {
        fn fetch(&self, ticker: &Ticker, _: &str, _: &str) -> Result<Vec<Sample>, FetchError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) >= self.healthy {
                panic!("fetch worker died on {}", ticker.symbol);
            }
            Ok(vec![Sample::new(0, 10.0), Sample::new(60_000, 12.0)])
        }
    }

    fn dying_loop() -> RefreshLoop<Scene> {
        let fetcher = DiesAfter {
            healthy: 2,
            calls: AtomicUsize::new(0),
        };
        RefreshLoop::new(&config(&["AAA", "BBB"]), Arc::new(fetcher), Scene::new(["AAA", "BBB"]))
    }

    #[test]
    fn lost_worker_skips_every_asset() {
        let mut rl = dying_loop();
        rl.tick().unwrap();
        let assets = rl.assets().to_vec();
        let bounds = rl.bounds().to_vec();
        let charts = rl.surface().charts.clone();

        let report = rl.tick().unwrap();
        assert!(report.updated.is_empty());
        assert_eq!(report.skipped, ["AAA", "BBB"]);
        assert_eq!(rl.phase(), LoopPhase::Idle);
        assert_eq!(rl.assets(), assets.as_slice());
        assert_eq!(rl.bounds(), bounds.as_slice());
        assert_eq!(rl.surface().charts, charts);
        assert_eq!(rl.surface().tape, "AAA --   |   BBB --");
    }

    #[test]
    fn lost_worker_skips_every_asset_when_polled() {
        let mut rl = dying_loop();
        rl.tick().unwrap();
        let assets = rl.assets().to_vec();

        let later = Instant::now() + Duration::from_secs(3600);
        let mut report = None;
        for _ in 0..500 {
            if let Some(r) = rl.poll(later).unwrap() {
                report = Some(r);
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        let report = report.unwrap();
        assert_eq!(report.skipped, ["AAA", "BBB"]);
        assert_eq!(rl.assets(), assets.as_slice());
        assert_eq!(rl.ticks(), 2);
    }
}
