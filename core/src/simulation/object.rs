use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Pool slot plus a generation bumped on every recycle, so markers from an
/// earlier pass never attach to the ship that replaced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId {
    pub slot: u32,
    pub generation: u32,
}

impl ObjectId {
    pub fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    pub fn next_generation(self) -> Self {
        Self {
            slot: self.slot,
            generation: self.generation.wrapping_add(1),
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ship#{}.{}", self.slot, self.generation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    Patrolling,
    Detected { since: Duration },
}

/// A ship travelling along -X toward the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingObject {
    pub(crate) id: ObjectId,
    pub(crate) position: Point3<f32>,
    pub(crate) speed: f32,
    pub(crate) state: ObjectState,
}

impl MovingObject {
    pub fn new(id: ObjectId, position: Point3<f32>, speed: f32) -> Self {
        Self {
            id,
            position,
            speed,
            state: ObjectState::Patrolling,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn state(&self) -> ObjectState {
        self.state
    }

    pub fn is_detected(&self) -> bool {
        matches!(self.state, ObjectState::Detected { .. })
    }

    pub fn detection_timestamp(&self) -> Option<Duration> {
        match self.state {
            ObjectState::Detected { since } => Some(since),
            ObjectState::Patrolling => None,
        }
    }
}
