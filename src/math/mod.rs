pub mod ode23;
pub mod polygon_2d;

use crate::error::{GeometryError, Result};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4D vector type, used for the `(x, y, vx, vy)` flattening state.
pub type Vector4 = nalgebra::Vector4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Signed angle from `a` to `b`, measured counter-clockwise about `axis`.
///
/// The result lies in `(-pi, pi]`. Only the sign of the component of `axis`
/// along `a x b` matters, so `axis` need not be normalized.
#[must_use]
pub fn signed_angle(a: &Vector3, b: &Vector3, axis: &Vector3) -> f64 {
    let cross = a.cross(b);
    let sin = cross.norm().copysign(cross.dot(axis));
    sin.atan2(a.dot(b))
}

/// Normalizes `axis` and `ref_dir` and completes them with
/// `binormal = axis x ref_dir` into a right-handed frame.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroVector`] if either input has no length and
/// [`GeometryError::Degenerate`] if they are not perpendicular.
pub fn orthonormal_frame(axis: &Vector3, ref_dir: &Vector3) -> Result<(Vector3, Vector3, Vector3)> {
    let axis = axis.try_normalize(TOLERANCE).ok_or(GeometryError::ZeroVector)?;
    let ref_dir = ref_dir
        .try_normalize(TOLERANCE)
        .ok_or(GeometryError::ZeroVector)?;
    if axis.dot(&ref_dir).abs() > TOLERANCE {
        return Err(GeometryError::Degenerate(
            "reference direction must be perpendicular to the axis".into(),
        )
        .into());
    }
    Ok((axis, ref_dir, axis.cross(&ref_dir)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn signed_angle_left_turn_is_positive() {
        let a = signed_angle(&Vector3::x(), &Vector3::y(), &Vector3::z());
        assert_relative_eq!(a, FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn signed_angle_right_turn_is_negative() {
        let a = signed_angle(&Vector3::x(), &Vector3::y(), &(-Vector3::z()));
        assert_relative_eq!(a, -FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn signed_angle_ignores_axis_length() {
        let a = signed_angle(
            &Vector3::new(1.0, 0.0, 0.0),
            &Vector3::new(-1.0, 1.0, 0.0),
            &Vector3::new(0.0, 0.0, 7.0),
        );
        assert_relative_eq!(a, 0.75 * PI, epsilon = 1e-12);
    }

    #[test]
    fn frame_is_right_handed() {
        let (a, r, b) =
            orthonormal_frame(&Vector3::new(0.0, 0.0, 3.0), &Vector3::new(2.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(a, Vector3::z());
        assert_relative_eq!(r, Vector3::x());
        assert_relative_eq!(b, Vector3::y());
    }

    #[test]
    fn frame_rejects_skew_or_zero_input() {
        assert!(orthonormal_frame(&Vector3::z(), &Vector3::new(1.0, 0.0, 1.0)).is_err());
        assert!(orthonormal_frame(&Vector3::zeros(), &Vector3::x()).is_err());
    }
}
