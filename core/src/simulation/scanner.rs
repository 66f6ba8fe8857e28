use crate::math::geometry::GeometryHelper;
use crate::prelude::ScannerConfig;
use crate::render_interface::frame::ScannerSnapshot;
use nalgebra::{Point3, Unit, Vector3};
use std::time::Duration;

/// Oscillating directional sensor with a fixed origin.
///
/// The direction swings around `pivot_axis` by `amplitude * sin(frequency * t)`.
/// A point is seen when it lies strictly inside the half-angle and no farther
/// than `max_range` from the origin.
#[derive(Debug, Clone)]
pub struct Scanner {
    origin: Point3<f32>,
    base_direction: Vector3<f32>,
    pivot_axis: Unit<Vector3<f32>>,
    half_angle: f32,
    max_range: f32,
    amplitude: f32,
    frequency: f32,
    direction: Vector3<f32>,
}

impl Scanner {
    pub fn new(config: &ScannerConfig) -> Self {
        let base_direction = Unit::try_new(config.base_direction, f32::EPSILON)
            .map(Unit::into_inner)
            .unwrap_or_else(Vector3::x);
        let pivot_axis =
            Unit::try_new(config.pivot_axis, f32::EPSILON).unwrap_or_else(Vector3::z_axis);

        let mut scanner = Self {
            origin: config.origin,
            base_direction,
            pivot_axis,
            half_angle: config.half_angle_deg.to_radians(),
            max_range: config.max_range,
            amplitude: config.amplitude_rad,
            frequency: config.frequency_rad_s,
            direction: base_direction,
        };
        scanner.update(Duration::ZERO);
        scanner
    }

    pub fn tilt_at(&self, elapsed: Duration) -> f32 {
        // Phase in f64 so the sweep stays smooth over long sessions.
        let phase = f64::from(self.frequency) * elapsed.as_secs_f64();
        let tilt = self.amplitude * phase.sin() as f32;
        if tilt.is_finite() {
            tilt
        } else {
            0.0
        }
    }

    pub fn direction_at(&self, elapsed: Duration) -> Vector3<f32> {
        GeometryHelper::rotate_about(&self.base_direction, &self.pivot_axis, self.tilt_at(elapsed))
    }

    /// Points the scanner at its orientation for `elapsed`.
    pub fn update(&mut self, elapsed: Duration) {
        self.direction = self.direction_at(elapsed);
    }

    pub fn direction(&self) -> Vector3<f32> {
        self.direction
    }

    pub fn origin(&self) -> Point3<f32> {
        self.origin
    }

    pub fn half_angle(&self) -> f32 {
        self.half_angle
    }

    pub fn max_range(&self) -> f32 {
        self.max_range
    }

    /// Strict on the angle, inclusive on the range. Always false for a
    /// non-positive range or half-angle and for the origin itself.
    pub fn contains(&self, point: &Point3<f32>) -> bool {
        if !(self.max_range > 0.0 && self.half_angle > 0.0) {
            return false;
        }
        let offset = point - self.origin;
        if !(offset.norm() <= self.max_range) {
            return false;
        }
        GeometryHelper::angle_between(&offset, &self.direction)
            .map(|angle| angle < self.half_angle)
            .unwrap_or(false)
    }

    pub fn snapshot(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            origin: self.origin,
            direction: self.direction,
            half_angle_rad: self.half_angle,
            max_range: self.max_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    fn scanner() -> Scanner {
        Scanner::new(&ScannerConfig::default())
    }

    fn along(scanner: &Scanner, direction: Vector3<f32>, distance: f32) -> Point3<f32> {
        scanner.origin() + direction.normalize() * distance
    }

    #[test]
    fn direction_starts_at_base_and_swings_to_amplitude() {
        let scanner = scanner();
        assert_relative_eq!(scanner.direction(), Vector3::x(), epsilon = 1e-6);

        let peak = Duration::from_secs_f32(std::f32::consts::FRAC_PI_2 / 3.0);
        assert_relative_eq!(scanner.tilt_at(peak), FRAC_PI_4, epsilon = 1e-5);
        let direction = scanner.direction_at(peak);
        assert_relative_eq!(direction.norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(direction.x, direction.y, epsilon = 1e-5);
    }

    #[test]
    fn sweep_step_stays_fine_after_a_week() {
        let scanner = scanner();
        let frame = Duration::from_micros(16_667);
        let max_step = |start: Duration| {
            (0..60u32)
                .map(|i| {
                    let a = scanner.tilt_at(start + frame * i);
                    let b = scanner.tilt_at(start + frame * (i + 1));
                    (b - a).abs()
                })
                .fold(0.0f32, f32::max)
        };
        let early = max_step(Duration::ZERO);
        let late = max_step(Duration::from_secs(604_800));
        assert!(early > 0.0);
        assert!(late <= early * 1.05, "late step {} vs early {}", late, early);
        assert!(late < 2.0 * scanner.half_angle());
    }

    #[test]
    fn point_at_exact_max_range_is_contained() {
        let scanner = Scanner::new(&ScannerConfig {
            origin: Point3::origin(),
            ..Default::default()
        });
        assert!(scanner.contains(&Point3::new(25.0, 0.0, 0.0)));
        assert!(!scanner.contains(&Point3::new(25.001, 0.0, 0.0)));
    }

    #[test]
    fn point_on_axis_within_range_is_contained() {
        let scanner = scanner();
        assert!(scanner.contains(&along(&scanner, scanner.direction(), 10.0)));
        assert!(scanner.contains(&along(&scanner, scanner.direction(), 24.99)));
    }

    #[test]
    fn point_beyond_range_is_never_contained() {
        let mut scanner = scanner();
        for step in 0..200 {
            scanner.update(Duration::from_millis(step * 16));
            let point = along(&scanner, scanner.direction(), 25.01);
            assert!(!scanner.contains(&point));
        }
    }

    #[test]
    fn angle_boundary_is_exclusive() {
        let scanner = scanner();
        let half = scanner.half_angle();
        let inside = GeometryHelper::rotate_about(&Vector3::x(), &Vector3::y_axis(), half * 0.99);
        let outside = GeometryHelper::rotate_about(&Vector3::x(), &Vector3::y_axis(), half * 1.01);
        assert!(scanner.contains(&along(&scanner, inside, 10.0)));
        assert!(!scanner.contains(&along(&scanner, outside, 10.0)));
    }

    #[test]
    fn point_at_exact_half_angle_is_not_contained() {
        let mut scanner = scanner();
        let point = along(&scanner, Vector3::new(1.0, 0.05, 0.0), 10.0);
        let angle =
            GeometryHelper::angle_between(&(point - scanner.origin()), &scanner.direction()).unwrap();

        scanner.half_angle = angle;
        assert!(!scanner.contains(&point));
        scanner.half_angle = angle + 1e-4;
        assert!(scanner.contains(&point));
    }

    #[test]
    fn degenerate_scanner_never_detects() {
        let zero_range = Scanner::new(&ScannerConfig {
            max_range: 0.0,
            ..Default::default()
        });
        assert!(!zero_range.contains(&along(&zero_range, Vector3::x(), 0.0)));
        assert!(!zero_range.contains(&along(&zero_range, Vector3::x(), 1.0)));

        let zero_angle = Scanner::new(&ScannerConfig {
            half_angle_deg: 0.0,
            ..Default::default()
        });
        assert!(!zero_angle.contains(&along(&zero_angle, Vector3::x(), 1.0)));
    }

    #[test]
    fn origin_itself_is_not_contained() {
        let scanner = scanner();
        assert!(!scanner.contains(&scanner.origin()));
    }

    #[test]
    fn zero_base_direction_falls_back_to_x() {
        let scanner = Scanner::new(&ScannerConfig {
            base_direction: Vector3::zeros(),
            ..Default::default()
        });
        assert_relative_eq!(scanner.direction(), Vector3::x(), epsilon = 1e-6);
    }
}
