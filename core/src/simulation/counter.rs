use serde::{Deserialize, Serialize};

/// Session tally of detections. Only ever goes up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionCounter {
    value: u64,
}

impl DetectionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one detection and returns the new total.
    pub fn increment(&mut self) -> u64 {
        self.value = self.value.saturating_add(1);
        self.value
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}
