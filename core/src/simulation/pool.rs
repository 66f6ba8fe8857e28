use crate::math::geometry::GeometryHelper;
use crate::prelude::PatrolConfig;
use crate::random::RandomSource;
use crate::render_interface::event::{RecycleEvent, RecycleReason};
use crate::simulation::object::{MovingObject, ObjectId, ObjectState};
use nalgebra::Point3;
use std::time::Duration;

/// Fixed-size set of ships; slots are recycled, never added or removed.
pub struct MovingObjectPool {
    objects: Vec<MovingObject>,
    patrol: PatrolConfig,
}

impl MovingObjectPool {
    /// Fills `patrol.pool_size` slots with ships drawn from the spawn volume.
    pub fn spawn<R: RandomSource + ?Sized>(patrol: PatrolConfig, rng: &mut R) -> Self {
        let objects = (0..patrol.pool_size)
            .map(|slot| {
                let (position, speed) = draw_spawn(&patrol, rng);
                let slot = u32::try_from(slot).unwrap_or(u32::MAX);
                MovingObject::new(ObjectId::new(slot, 0), position, speed)
            })
            .collect();
        Self { objects, patrol }
    }

    /// Builds a pool from hand-placed ships. Slot ids are reassigned by index.
    pub fn from_objects(patrol: PatrolConfig, objects: Vec<MovingObject>) -> Self {
        let objects = objects
            .into_iter()
            .enumerate()
            .map(|(slot, mut object)| {
                object.id.slot = u32::try_from(slot).unwrap_or(u32::MAX);
                object
            })
            .collect();
        Self { objects, patrol }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&MovingObject> {
        self.objects.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovingObject> {
        self.objects.iter()
    }

    pub fn patrol(&self) -> &PatrolConfig {
        &self.patrol
    }

    /// Moves every patrolling ship `speed * dt` along -X; `dt` is in reference
    /// ticks. Ships that pass the exit boundary unseen are recycled.
    pub fn advance<R: RandomSource + ?Sized>(&mut self, dt: f32, rng: &mut R) -> Vec<RecycleEvent> {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let mut exited = Vec::new();

        for (slot, object) in self.objects.iter_mut().enumerate() {
            if object.state != ObjectState::Patrolling {
                continue;
            }
            object.position.x -= object.speed * dt;
            if object.position.x < self.patrol.exit_x {
                exited.push(slot);
            }
        }

        exited
            .into_iter()
            .filter_map(|slot| self.recycle(slot, RecycleReason::ExitedUndetected, rng))
            .collect()
    }

    /// Respawns the ship in `slot` on the far side with a fresh speed and a
    /// new generation; clears any detection state.
    pub fn recycle<R: RandomSource + ?Sized>(
        &mut self,
        slot: usize,
        reason: RecycleReason,
        rng: &mut R,
    ) -> Option<RecycleEvent> {
        let (position, speed) = draw_spawn(&self.patrol, rng);
        let object = self.objects.get_mut(slot)?;
        let previous = object.id;

        object.id = previous.next_generation();
        object.position = position;
        object.speed = speed;
        object.state = ObjectState::Patrolling;

        Some(RecycleEvent {
            previous,
            object: object.id,
            position,
            reason,
        })
    }

    pub(crate) fn mark_detected(&mut self, slot: usize, now: Duration) {
        if let Some(object) = self.objects.get_mut(slot) {
            object.state = ObjectState::Detected { since: now };
        }
    }

    pub fn in_spawn_volume(&self, point: &Point3<f32>) -> bool {
        GeometryHelper::box_contains(&self.patrol.spawn_min, &self.patrol.spawn_max, point)
    }
}

fn draw_spawn<R: RandomSource + ?Sized>(patrol: &PatrolConfig, rng: &mut R) -> (Point3<f32>, f32) {
    let samples = [rng.next_unit(), rng.next_unit(), rng.next_unit()];
    let position = GeometryHelper::lerp_box(&patrol.spawn_min, &patrol.spawn_max, samples);
    let speed = patrol.speed_min + rng.next_unit() * (patrol.speed_max - patrol.speed_min);
    (position, speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceSource;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn spawn_fills_pool_inside_volume() {
        let mut rng = StdRng::seed_from_u64(3);
        let pool = MovingObjectPool::spawn(PatrolConfig::default(), &mut rng);
        assert_eq!(pool.len(), 8);
        for object in pool.iter() {
            assert!(pool.in_spawn_volume(&object.position()));
            assert!((0.05..0.08).contains(&object.speed()));
            assert!(!object.is_detected());
        }
    }

    #[test]
    fn spawn_uses_sampled_offsets() {
        let mut rng = SequenceSource::new(vec![0.0, 0.5, 0.5, 0.5]);
        let pool = MovingObjectPool::spawn(
            PatrolConfig {
                pool_size: 1,
                ..Default::default()
            },
            &mut rng,
        );
        let ship = pool.get(0).unwrap();
        assert_relative_eq!(ship.position(), Point3::new(20.0, 2.0, 5.5), epsilon = 1e-5);
        assert_relative_eq!(ship.speed(), 0.065, epsilon = 1e-5);
    }

    #[test]
    fn advance_moves_only_patrolling_ships() {
        let mut rng = SequenceSource::new(vec![0.5]);
        let ships = vec![
            MovingObject::new(ObjectId::new(0, 0), Point3::new(10.0, 0.0, 0.0), 0.05),
            MovingObject::new(ObjectId::new(0, 0), Point3::new(10.0, 0.0, 0.0), 0.05),
        ];
        let mut pool = MovingObjectPool::from_objects(PatrolConfig::default(), ships);
        pool.mark_detected(1, Duration::ZERO);

        let exited = pool.advance(2.0, &mut rng);
        assert!(exited.is_empty());
        assert_relative_eq!(pool.get(0).unwrap().position().x, 9.9, epsilon = 1e-5);
        assert_relative_eq!(pool.get(1).unwrap().position().x, 10.0, epsilon = 1e-5);
        assert_eq!(pool.get(1).unwrap().id(), ObjectId::new(1, 0));
    }

    #[test]
    fn ship_past_exit_boundary_is_recycled_to_far_side() {
        let mut rng = SequenceSource::new(vec![0.25, 0.75, 0.1, 0.9]);
        let ships = vec![MovingObject::new(
            ObjectId::new(0, 0),
            Point3::new(-19.97, 2.0, 5.5),
            0.05,
        )];
        let mut pool = MovingObjectPool::from_objects(PatrolConfig::default(), ships);

        let exited = pool.advance(1.0, &mut rng);
        assert_eq!(exited.len(), 1);
        assert_eq!(exited[0].reason, RecycleReason::ExitedUndetected);
        assert_eq!(exited[0].previous, ObjectId::new(0, 0));
        assert_eq!(exited[0].object, ObjectId::new(0, 1));

        let ship = pool.get(0).unwrap();
        assert!(pool.in_spawn_volume(&ship.position()));
        assert_relative_eq!(ship.position().x, 21.25, epsilon = 1e-5);
        assert!(!ship.is_detected());
    }

    #[test]
    fn recycle_clears_detection() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut pool = MovingObjectPool::spawn(PatrolConfig::default(), &mut rng);
        pool.mark_detected(4, Duration::from_millis(250));
        assert_eq!(
            pool.get(4).unwrap().detection_timestamp(),
            Some(Duration::from_millis(250))
        );

        let event = pool
            .recycle(4, RecycleReason::DisplayElapsed, &mut rng)
            .unwrap();
        let ship = pool.get(4).unwrap();
        assert_eq!(ship.detection_timestamp(), None);
        assert_eq!(ship.id(), event.object);
        assert!(pool.in_spawn_volume(&ship.position()));
        assert_eq!(pool.len(), 8);
    }

    #[test]
    fn recycle_of_missing_slot_is_none() {
        let mut rng = SequenceSource::new(vec![0.5]);
        let mut pool = MovingObjectPool::from_objects(PatrolConfig::default(), Vec::new());
        assert!(pool
            .recycle(0, RecycleReason::ExitedUndetected, &mut rng)
            .is_none());
        assert!(pool.advance(1.0, &mut rng).is_empty());
    }
}
