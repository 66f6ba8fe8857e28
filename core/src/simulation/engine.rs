use crate::prelude::LifecyclePolicy;
use crate::random::RandomSource;
use crate::render_interface::event::{DetectionEvent, RecycleReason, SceneEvent};
use crate::simulation::counter::DetectionCounter;
use crate::simulation::markers::{Marker, MarkerSet};
use crate::simulation::object::ObjectState;
use crate::simulation::pool::MovingObjectPool;
use crate::simulation::scanner::Scanner;
use crate::telemetry::log::LogManager;
use std::time::Duration;

/// Per-tick detection test and lifecycle bookkeeping.
///
/// Timed lifecycle: `Patrolling -> Detected` (frozen, hold marker) until the
/// display window elapses, then the slot is recycled. Immediate lifecycle:
/// the ship is counted, pulsed and recycled within the same tick. One policy
/// governs every ship of an engine.
pub struct DetectionEngine {
    policy: LifecyclePolicy,
    counter: DetectionCounter,
    markers: MarkerSet,
    logger: LogManager,
}

impl DetectionEngine {
    pub fn new(policy: LifecyclePolicy) -> Self {
        Self {
            policy,
            counter: DetectionCounter::new(),
            markers: MarkerSet::new(),
            logger: LogManager::new(),
        }
    }

    pub fn policy(&self) -> LifecyclePolicy {
        self.policy
    }

    pub fn detections(&self) -> u64 {
        self.counter.value()
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// Runs one detection pass at `now` against already-advanced positions.
    pub fn run<R: RandomSource + ?Sized>(
        &mut self,
        now: Duration,
        scanner: &Scanner,
        pool: &mut MovingObjectPool,
        rng: &mut R,
    ) -> Vec<SceneEvent> {
        let mut events = Vec::new();
        self.markers.prune(now);

        for slot in 0..pool.len() {
            let (id, position, state) = match pool.get(slot) {
                Some(object) => (object.id(), object.position(), object.state()),
                None => continue,
            };

            match state {
                ObjectState::Detected { since } => {
                    let display = self.policy.display_duration().unwrap_or(Duration::ZERO);
                    if now.saturating_sub(since) < display {
                        continue;
                    }
                    self.markers.clear_object(id);
                    if let Some(recycled) = pool.recycle(slot, RecycleReason::DisplayElapsed, rng) {
                        self.logger.record_recycle(&recycled);
                        events.push(SceneEvent::Recycled(recycled));
                    }
                }
                ObjectState::Patrolling => {
                    if !scanner.contains(&position) {
                        continue;
                    }
                    let detection = DetectionEvent {
                        object: id,
                        position,
                        at_ms: millis(now),
                        count: self.counter.increment(),
                    };
                    self.logger.record_detection(&detection);
                    events.push(SceneEvent::Detected(detection));

                    match self.policy {
                        LifecyclePolicy::Timed { .. } => {
                            pool.mark_detected(slot, now);
                            self.markers.spawn(Marker::hold(id, position, now));
                        }
                        LifecyclePolicy::Immediate => {
                            self.markers.spawn(Marker::pulse(id, position, now));
                            if let Some(recycled) = pool.recycle(slot, RecycleReason::Detected, rng) {
                                self.logger.record_recycle(&recycled);
                                events.push(SceneEvent::Recycled(recycled));
                            }
                        }
                    }
                }
            }
        }

        events
    }
}

pub(crate) fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::{PatrolConfig, ScannerConfig};
    use crate::random::SequenceSource;
    use crate::simulation::markers::MarkerKind;
    use crate::simulation::object::{MovingObject, ObjectId};

    fn ship_in_beam(scanner: &Scanner, distance: f32) -> MovingObject {
        let position = scanner.origin() + scanner.direction() * distance;
        MovingObject::new(ObjectId::new(0, 0), position, 0.0)
    }

    fn setup(distance: f32) -> (Scanner, MovingObjectPool) {
        let scanner = Scanner::new(&ScannerConfig::default());
        let pool = MovingObjectPool::from_objects(
            PatrolConfig::default(),
            vec![ship_in_beam(&scanner, distance)],
        );
        (scanner, pool)
    }

    #[test]
    fn timed_detection_freezes_and_holds_marker() {
        let (scanner, mut pool) = setup(10.0);
        let mut rng = SequenceSource::new(vec![0.5]);
        let mut engine = DetectionEngine::new(LifecyclePolicy::Timed { display_ms: 3000 });

        let events = engine.run(Duration::ZERO, &scanner, &mut pool, &mut rng);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], SceneEvent::Detected(d) if d.count == 1));
        assert_eq!(engine.detections(), 1);
        assert!(pool.get(0).unwrap().is_detected());
        assert_eq!(engine.markers().len(), 1);

        let again = engine.run(Duration::from_millis(2999), &scanner, &mut pool, &mut rng);
        assert!(again.is_empty());
        assert_eq!(engine.detections(), 1);

        let expired = engine.run(Duration::from_millis(3000), &scanner, &mut pool, &mut rng);
        assert_eq!(expired.len(), 1);
        match &expired[0] {
            SceneEvent::Recycled(recycle) => {
                assert_eq!(recycle.reason, RecycleReason::DisplayElapsed);
                assert_eq!(recycle.previous, ObjectId::new(0, 0));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(engine.markers().is_empty());
        let ship = pool.get(0).unwrap();
        assert!(!ship.is_detected());
        assert!(pool.in_spawn_volume(&ship.position()));
    }

    #[test]
    fn immediate_detection_counts_pulses_and_respawns() {
        let (scanner, mut pool) = setup(10.0);
        let mut rng = SequenceSource::new(vec![0.5]);
        let mut engine = DetectionEngine::new(LifecyclePolicy::Immediate);

        let events = engine.run(Duration::from_millis(16), &scanner, &mut pool, &mut rng);
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], SceneEvent::Detected(_)));
        assert!(matches!(
            &events[1],
            SceneEvent::Recycled(r) if r.reason == RecycleReason::Detected
        ));
        assert_eq!(engine.detections(), 1);

        let marker = engine.markers().for_object(ObjectId::new(0, 0)).next().unwrap();
        assert_eq!(marker.kind(), MarkerKind::Pulse);

        let ship = pool.get(0).unwrap();
        assert!(!ship.is_detected());
        assert_eq!(ship.id(), ObjectId::new(0, 1));
        assert!(pool.in_spawn_volume(&ship.position()));

        engine.run(Duration::from_millis(416), &scanner, &mut pool, &mut rng);
        assert!(engine.markers().is_empty());
    }

    #[test]
    fn out_of_range_ship_is_ignored() {
        let (scanner, mut pool) = setup(30.0);
        let mut rng = SequenceSource::new(vec![0.5]);
        let mut engine = DetectionEngine::new(LifecyclePolicy::default());
        for step in 0..100 {
            let events = engine.run(Duration::from_millis(step * 16), &scanner, &mut pool, &mut rng);
            assert!(events.is_empty());
        }
        assert_eq!(engine.detections(), 0);
        assert_eq!(pool.get(0).unwrap().position(), scanner.origin() + scanner.direction() * 30.0);
    }

    #[test]
    fn empty_pool_is_a_no_op() {
        let scanner = Scanner::new(&ScannerConfig::default());
        let mut pool = MovingObjectPool::from_objects(PatrolConfig::default(), Vec::new());
        let mut rng = SequenceSource::new(Vec::new());
        let mut engine = DetectionEngine::new(LifecyclePolicy::default());
        assert!(engine
            .run(Duration::from_secs(1), &scanner, &mut pool, &mut rng)
            .is_empty());
        assert_eq!(engine.detections(), 0);
    }
}
