use crate::generator::scene::build_simulation;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::info;
use scancore::telemetry::{MetricsRecorder, MetricsSnapshot};
use scancore::{DisplayAdapter, FrameReport};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

pub struct WorkflowResult {
    pub ticks: u64,
    pub elapsed_ms: u64,
    pub detection_count: u64,
    pub metrics: MetricsSnapshot,
    pub final_frame: Option<FrameReport>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.metrics.clone()
    }

    /// Runs `config.ticks` fixed-interval ticks on a virtual clock.
    pub fn execute<D: DisplayAdapter>(&self, display: &mut D) -> anyhow::Result<WorkflowResult> {
        let mut simulation = build_simulation(&self.config)
            .context("building offline simulation")?
            .with_metrics(self.metrics.clone());
        let frame_interval = self.config.frame_interval();

        let mut final_frame = None;
        for _ in 0..self.config.ticks {
            let frame = simulation.tick(frame_interval);
            display.present(&frame);
            final_frame = Some(frame);
        }

        info!(
            "offline run finished: {} ticks, {} detections",
            simulation.ticks(),
            simulation.detections()
        );

        Ok(WorkflowResult {
            ticks: simulation.ticks(),
            elapsed_ms: u64::try_from(simulation.elapsed().as_millis()).unwrap_or(u64::MAX),
            detection_count: simulation.detections(),
            metrics: self.metrics.snapshot(),
            final_frame,
        })
    }

    /// Drives the simulation from a wall-clock interval until `shutdown` resolves.
    pub async fn run_realtime<D, F>(&self, display: &mut D, shutdown: F) -> anyhow::Result<WorkflowResult>
    where
        D: DisplayAdapter,
        F: Future<Output = ()>,
    {
        let mut simulation = build_simulation(&self.config)
            .context("building real-time simulation")?
            .with_metrics(self.metrics.clone());

        let mut interval = time::interval(self.config.frame_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut last = Instant::now();
        let mut final_frame = None;
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                now = interval.tick() => {
                    let dt = now.saturating_duration_since(last);
                    last = now;
                    let frame = simulation.tick(dt);
                    display.present(&frame);
                    final_frame = Some(frame);
                }
            }
        }

        Ok(WorkflowResult {
            ticks: simulation.ticks(),
            elapsed_ms: u64::try_from(simulation.elapsed().as_millis()).unwrap_or(u64::MAX),
            detection_count: simulation.detections(),
            metrics: self.metrics.snapshot(),
            final_frame,
        })
    }
}

/// Elapsed-time helper for the summary line.
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let elapsed = Duration::from_millis(elapsed_ms);
    format!("{:.1}s", elapsed.as_secs_f32())
}
