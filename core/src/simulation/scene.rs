use crate::prelude::SceneConfig;
use crate::random::RandomSource;
use crate::render_interface::display::counter_label;
use crate::render_interface::event::{RecycleReason, SceneEvent};
use crate::render_interface::frame::{FrameReport, ObjectSnapshot};
use crate::simulation::engine::{millis, DetectionEngine};
use crate::simulation::pool::MovingObjectPool;
use crate::simulation::scanner::Scanner;
use crate::telemetry::metrics::MetricsRecorder;
use log::debug;
use std::sync::Arc;
use std::time::Duration;

const FALLBACK_TICK_RATE_HZ: f32 = 60.0;

/// All mutable scene state, advanced only through [`Simulation::tick`].
///
/// Each tick swings the scanner, moves the pool, runs the detection pass and
/// returns a [`FrameReport`] for the render surface.
pub struct Simulation<R: RandomSource> {
    config: SceneConfig,
    scanner: Scanner,
    pool: MovingObjectPool,
    engine: DetectionEngine,
    rng: R,
    elapsed: Duration,
    ticks: u64,
    metrics: Arc<MetricsRecorder>,
}

impl<R: RandomSource> Simulation<R> {
    pub fn new(config: SceneConfig, mut rng: R) -> Self {
        let pool = MovingObjectPool::spawn(config.patrol.clone(), &mut rng);
        Self::with_pool(config, pool, rng)
    }

    /// Starts from a hand-built pool instead of a random spawn.
    pub fn with_pool(config: SceneConfig, pool: MovingObjectPool, rng: R) -> Self {
        Self {
            scanner: Scanner::new(&config.scanner),
            engine: DetectionEngine::new(config.lifecycle),
            pool,
            rng,
            elapsed: Duration::ZERO,
            ticks: 0,
            metrics: Arc::new(MetricsRecorder::new()),
            config,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Reference ticks covered by `dt`; ship speeds are expressed per tick.
    pub fn steps_for(&self, dt: Duration) -> f32 {
        let rate = if self.config.tick_rate_hz.is_finite() && self.config.tick_rate_hz > 0.0 {
            self.config.tick_rate_hz
        } else {
            FALLBACK_TICK_RATE_HZ
        };
        dt.as_secs_f32() * rate
    }

    pub fn tick(&mut self, dt: Duration) -> FrameReport {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.ticks += 1;

        self.scanner.update(self.elapsed);

        let steps = self.steps_for(dt);
        let mut events: Vec<SceneEvent> = self
            .pool
            .advance(steps, &mut self.rng)
            .into_iter()
            .map(SceneEvent::Recycled)
            .collect();
        events.extend(
            self.engine
                .run(self.elapsed, &self.scanner, &mut self.pool, &mut self.rng),
        );

        self.record_metrics(&events);
        if !events.is_empty() {
            debug!("tick {} produced {} events", self.ticks, events.len());
        }
        self.report(events)
    }

    fn record_metrics(&self, events: &[SceneEvent]) {
        self.metrics.record_tick();
        for event in events {
            match event {
                SceneEvent::Detected(_) => self.metrics.record_detection(),
                SceneEvent::Recycled(recycle) => match recycle.reason {
                    RecycleReason::ExitedUndetected => self.metrics.record_boundary_recycle(),
                    RecycleReason::DisplayElapsed => self.metrics.record_expiration(),
                    RecycleReason::Detected => self.metrics.record_respawn(),
                },
            }
        }
    }

    fn report(&self, events: Vec<SceneEvent>) -> FrameReport {
        let detections = self.engine.detections();
        FrameReport {
            tick: self.ticks,
            elapsed_ms: millis(self.elapsed),
            detections,
            label: counter_label(detections),
            scanner: self.scanner.snapshot(),
            objects: self
                .pool
                .iter()
                .map(|object| ObjectSnapshot {
                    id: object.id(),
                    position: object.position(),
                    detected: object.is_detected(),
                    detected_at_ms: object.detection_timestamp().map(millis),
                })
                .collect(),
            markers: self.engine.markers().snapshots(self.elapsed),
            events,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    pub fn pool(&self) -> &MovingObjectPool {
        &self.pool
    }

    pub fn engine(&self) -> &DetectionEngine {
        &self.engine
    }

    pub fn detections(&self) -> u64 {
        self.engine.detections()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.metrics.clone()
    }
}
