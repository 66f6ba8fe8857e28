use crate::simulation::object::ObjectId;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A ship entering the scanner for the first time in its pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionEvent {
    pub object: ObjectId,
    pub position: Point3<f32>,
    pub at_ms: u64,
    /// Counter value after this detection was tallied.
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecycleReason {
    /// Left the patrol volume without being seen.
    ExitedUndetected,
    /// Display window after a detection elapsed.
    DisplayElapsed,
    /// Respawned in the same tick it was detected.
    Detected,
}

/// A pool slot handed to a fresh ship on the far side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecycleEvent {
    pub previous: ObjectId,
    pub object: ObjectId,
    pub position: Point3<f32>,
    pub reason: RecycleReason,
}

/// Declarative notifications for the render surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneEvent {
    Detected(DetectionEvent),
    Recycled(RecycleEvent),
}
