pub mod display;
pub mod event;
pub mod frame;

pub use display::{counter_label, CounterOverlay, DisplayAdapter, Theme, Typewriter, TypewriterFrame};
pub use event::{DetectionEvent, RecycleEvent, RecycleReason, SceneEvent};
pub use frame::{FrameReport, MarkerSnapshot, ObjectSnapshot, ScannerSnapshot};
