use crate::render_interface::event::{DetectionEvent, SceneEvent};
use crate::simulation::markers::MarkerKind;
use crate::simulation::object::ObjectId;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScannerSnapshot {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
    pub half_angle_rad: f32,
    pub max_range: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectSnapshot {
    pub id: ObjectId,
    pub position: Point3<f32>,
    pub detected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_at_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkerSnapshot {
    pub object: ObjectId,
    pub kind: MarkerKind,
    pub position: Point3<f32>,
    pub scale: f32,
    pub opacity: f32,
}

/// Everything a render surface needs to draw one tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameReport {
    pub tick: u64,
    pub elapsed_ms: u64,
    pub detections: u64,
    pub label: String,
    pub scanner: ScannerSnapshot,
    pub objects: Vec<ObjectSnapshot>,
    pub markers: Vec<MarkerSnapshot>,
    #[serde(default)]
    pub events: Vec<SceneEvent>,
}

impl FrameReport {
    pub fn detection_events(&self) -> impl Iterator<Item = &DetectionEvent> {
        self.events.iter().filter_map(|event| match event {
            SceneEvent::Detected(detection) => Some(detection),
            SceneEvent::Recycled(_) => None,
        })
    }
}
