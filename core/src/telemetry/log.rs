use crate::render_interface::event::{DetectionEvent, RecycleEvent};
use log::{debug, info};

pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record_detection(&self, event: &DetectionEvent) {
        info!(
            "DETECTED {} at ({:.2}, {:.2}, {:.2}) t={}ms total={}",
            event.object,
            event.position.x,
            event.position.y,
            event.position.z,
            event.at_ms,
            event.count
        );
    }

    pub fn record_recycle(&self, event: &RecycleEvent) {
        debug!(
            "recycled {} -> {} ({:?}) at x={:.2}",
            event.previous, event.object, event.reason, event.position.x
        );
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
