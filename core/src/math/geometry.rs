use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

pub struct GeometryHelper;

impl GeometryHelper {
    /// Angle in `[0, π]` between two vectors, `None` when either has no length.
    pub fn angle_between(lhs: &Vector3<f32>, rhs: &Vector3<f32>) -> Option<f32> {
        let norms = lhs.norm() * rhs.norm();
        if !(norms > 0.0) || !norms.is_finite() {
            return None;
        }
        let cosine = (lhs.dot(rhs) / norms).clamp(-1.0, 1.0);
        Some(cosine.acos())
    }

    /// Rotates `vector` by `angle` radians around `axis` (right-handed).
    pub fn rotate_about(vector: &Vector3<f32>, axis: &Unit<Vector3<f32>>, angle: f32) -> Vector3<f32> {
        UnitQuaternion::from_axis_angle(axis, angle) * vector
    }

    /// Maps three unit samples in `[0, 1)` onto the box spanned by `min` and `max`.
    pub fn lerp_box(min: &Point3<f32>, max: &Point3<f32>, samples: [f32; 3]) -> Point3<f32> {
        Point3::new(
            min.x + samples[0] * (max.x - min.x),
            min.y + samples[1] * (max.y - min.y),
            min.z + samples[2] * (max.z - min.z),
        )
    }

    pub fn box_contains(min: &Point3<f32>, max: &Point3<f32>, point: &Point3<f32>) -> bool {
        (0..3).all(|axis| point[axis] >= min[axis] && point[axis] <= max[axis])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn angle_between_covers_zero_to_pi() {
        let x = Vector3::x();
        assert_relative_eq!(GeometryHelper::angle_between(&x, &x).unwrap(), 0.0);
        assert_relative_eq!(
            GeometryHelper::angle_between(&x, &Vector3::y()).unwrap(),
            FRAC_PI_2
        );
        assert_relative_eq!(GeometryHelper::angle_between(&x, &-x).unwrap(), PI);
    }

    #[test]
    fn angle_with_zero_vector_is_undefined() {
        assert_eq!(
            GeometryHelper::angle_between(&Vector3::zeros(), &Vector3::x()),
            None
        );
    }

    #[test]
    fn rotation_about_z_tilts_x_toward_y() {
        let rotated = GeometryHelper::rotate_about(&Vector3::x(), &Vector3::z_axis(), FRAC_PI_2);
        assert_relative_eq!(rotated, Vector3::y(), epsilon = 1e-6);
    }

    #[test]
    fn lerp_box_stays_inside_box() {
        let min = Point3::new(20.0, -3.0, 0.5);
        let max = Point3::new(25.0, 7.0, 10.5);
        let point = GeometryHelper::lerp_box(&min, &max, [0.0, 0.5, 0.999]);
        assert_relative_eq!(point.x, 20.0);
        assert_relative_eq!(point.y, 2.0);
        assert!(GeometryHelper::box_contains(&min, &max, &point));
        assert!(!GeometryHelper::box_contains(&min, &max, &Point3::new(19.9, 2.0, 5.0)));
    }
}
