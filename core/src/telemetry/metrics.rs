use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Counters shared between the tick driver and whoever reports on it.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub detections: u64,
    pub boundary_recycles: u64,
    pub expirations: u64,
    /// Immediate-lifecycle respawns of a just-detected ship.
    pub respawns: u64,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_tick(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.ticks += 1;
        }
    }

    pub fn record_detection(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.detections += 1;
        }
    }

    pub fn record_boundary_recycle(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.boundary_recycles += 1;
        }
    }

    pub fn record_expiration(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.expirations += 1;
        }
    }

    pub fn record_respawn(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.respawns += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_counts() {
        let metrics = MetricsRecorder::new();
        metrics.record_tick();
        metrics.record_tick();
        metrics.record_detection();
        metrics.record_expiration();
        metrics.record_respawn();
        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                ticks: 2,
                detections: 1,
                boundary_recycles: 0,
                expirations: 1,
                respawns: 1,
            }
        );
    }
}
