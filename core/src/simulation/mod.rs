pub mod counter;
pub mod engine;
pub mod markers;
pub mod object;
pub mod pool;
pub mod scanner;
pub mod scene;

pub use counter::DetectionCounter;
pub use engine::DetectionEngine;
pub use markers::{Marker, MarkerKind, MarkerSet};
pub use object::{MovingObject, ObjectId, ObjectState};
pub use pool::MovingObjectPool;
pub use scanner::Scanner;
pub use scene::Simulation;
