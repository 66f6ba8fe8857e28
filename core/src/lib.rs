//! Detection simulation core for the ship-scanner scene.
//!
//! A fixed pool of ships patrols toward an oscillating scanner. Each tick the
//! detection engine tests the pool against the scanner cone, counts new
//! detections and emits declarative frame reports for whatever surface draws
//! the scene.

pub mod math;
pub mod prelude;
pub mod random;
pub mod render_interface;
pub mod simulation;
pub mod telemetry;

pub use prelude::{ConfigError, LifecyclePolicy, SceneConfig};
pub use render_interface::{DisplayAdapter, FrameReport};
pub use simulation::Simulation;
