use crate::render_interface::frame::MarkerSnapshot;
use crate::simulation::object::ObjectId;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const PULSE_STEP: Duration = Duration::from_millis(50);
const PULSE_STEPS: u32 = 8;
const PULSE_START_SCALE: f32 = 0.5;
const HOLD_OPACITY: f32 = 0.8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// Stays until the detected ship is recycled.
    Hold,
    /// Grows and fades on its own, gone after eight 50 ms steps.
    Pulse,
}

/// Transient detection marker, sampled by time rather than driven by timers.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    object: ObjectId,
    kind: MarkerKind,
    position: Point3<f32>,
    born: Duration,
}

impl Marker {
    pub fn hold(object: ObjectId, position: Point3<f32>, born: Duration) -> Self {
        Self {
            object,
            kind: MarkerKind::Hold,
            position,
            born,
        }
    }

    pub fn pulse(object: ObjectId, position: Point3<f32>, born: Duration) -> Self {
        Self {
            object,
            kind: MarkerKind::Pulse,
            position,
            born,
        }
    }

    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    fn pulse_steps(&self, now: Duration) -> u32 {
        let age = now.saturating_sub(self.born).as_millis() / PULSE_STEP.as_millis();
        u32::try_from(age).unwrap_or(u32::MAX)
    }

    pub fn is_expired(&self, now: Duration) -> bool {
        match self.kind {
            MarkerKind::Hold => false,
            MarkerKind::Pulse => self.pulse_steps(now) >= PULSE_STEPS,
        }
    }

    /// Scale and opacity at `now`, or `None` once a pulse has faded out.
    pub fn visual(&self, now: Duration) -> Option<(f32, f32)> {
        match self.kind {
            MarkerKind::Hold => Some((1.0, HOLD_OPACITY)),
            MarkerKind::Pulse => {
                let steps = self.pulse_steps(now);
                if steps >= PULSE_STEPS {
                    return None;
                }
                let scale = PULSE_START_SCALE + 0.1 * steps as f32;
                let opacity = (PULSE_STEPS - steps) as f32 / 10.0;
                Some((scale, opacity))
            }
        }
    }

    pub fn snapshot(&self, now: Duration) -> Option<MarkerSnapshot> {
        self.visual(now).map(|(scale, opacity)| MarkerSnapshot {
            object: self.object,
            kind: self.kind,
            position: self.position,
            scale,
            opacity,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    /// Drops every marker attached to `object`; returns how many went.
    pub fn clear_object(&mut self, object: ObjectId) -> usize {
        let before = self.markers.len();
        self.markers.retain(|marker| marker.object != object);
        before - self.markers.len()
    }

    /// Drops faded pulses.
    pub fn prune(&mut self, now: Duration) -> usize {
        let before = self.markers.len();
        self.markers.retain(|marker| !marker.is_expired(now));
        before - self.markers.len()
    }

    pub fn for_object(&self, object: ObjectId) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(move |marker| marker.object == object)
    }

    pub fn snapshots(&self, now: Duration) -> Vec<MarkerSnapshot> {
        self.markers
            .iter()
            .filter_map(|marker| marker.snapshot(now))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn id(slot: u32) -> ObjectId {
        ObjectId::new(slot, 0)
    }

    #[test]
    fn pulse_grows_and_fades_in_fifty_ms_steps() {
        let marker = Marker::pulse(id(0), Point3::origin(), Duration::from_millis(1000));

        let (scale, opacity) = marker.visual(Duration::from_millis(1000)).unwrap();
        assert_relative_eq!(scale, 0.5);
        assert_relative_eq!(opacity, 0.8);

        let (scale, opacity) = marker.visual(Duration::from_millis(1149)).unwrap();
        assert_relative_eq!(scale, 0.7, epsilon = 1e-6);
        assert_relative_eq!(opacity, 0.6, epsilon = 1e-6);

        let (_, opacity) = marker.visual(Duration::from_millis(1399)).unwrap();
        assert_relative_eq!(opacity, 0.1, epsilon = 1e-6);
        assert!(marker.visual(Duration::from_millis(1400)).is_none());
        assert!(marker.is_expired(Duration::from_millis(1400)));
    }

    #[test]
    fn hold_marker_never_expires_on_its_own() {
        let marker = Marker::hold(id(0), Point3::origin(), Duration::ZERO);
        assert!(!marker.is_expired(Duration::from_secs(3600)));
        assert_eq!(marker.visual(Duration::from_secs(3600)), Some((1.0, 0.8)));
    }

    #[test]
    fn prune_and_clear_remove_the_right_markers() {
        let mut markers = MarkerSet::new();
        markers.spawn(Marker::pulse(id(0), Point3::origin(), Duration::ZERO));
        markers.spawn(Marker::hold(id(1), Point3::origin(), Duration::ZERO));
        markers.spawn(Marker::hold(id(2), Point3::origin(), Duration::ZERO));

        assert_eq!(markers.prune(Duration::from_millis(200)), 0);
        assert_eq!(markers.prune(Duration::from_millis(400)), 1);
        assert_eq!(markers.clear_object(id(1)), 1);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers.for_object(id(2)).count(), 1);
        assert_eq!(markers.snapshots(Duration::from_millis(400)).len(), 1);
    }
}
