use crate::error::{GeometryError, Result};
use crate::math::{orthonormal_frame, Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// A circular arc in 3D space.
///
/// Defined by a center, radius, normal axis, and a reference direction
/// for the zero-angle. The parametric form sweeps from `start_angle`
/// to `end_angle` (in radians) around the normal axis.
#[derive(Debug, Clone)]
pub struct Arc {
    center: Point3,
    radius: f64,
    normal: Vector3,
    ref_dir: Vector3,
    start_angle: f64,
    end_angle: f64,
}

impl Arc {
    /// Creates a new arc.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the arc circle
    /// * `radius` - Radius (must be positive)
    /// * `normal` - Normal vector defining the arc plane
    /// * `ref_dir` - Reference direction for angle = 0 (must be perpendicular to normal)
    /// * `start_angle` - Start angle in radians
    /// * `end_angle` - End angle in radians (must exceed `start_angle`)
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, the normal is zero-length,
    /// the reference direction is not perpendicular to the normal, or the
    /// angle range is empty.
    pub fn new(
        center: Point3,
        radius: f64,
        normal: Vector3,
        ref_dir: Vector3,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        if end_angle - start_angle < TOLERANCE {
            return Err(GeometryError::Degenerate("arc sweep must be positive".into()).into());
        }

        let (normal, ref_dir, _) = orthonormal_frame(&normal, &ref_dir)?;

        Ok(Self {
            center,
            radius,
            normal,
            ref_dir,
            start_angle,
            end_angle,
        })
    }

    /// Returns the center of the arc.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius of the arc.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the normal vector of the arc plane.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Computes the second axis direction (perpendicular to both normal and `ref_dir`).
    fn binormal(&self) -> Vector3 {
        self.normal.cross(&self.ref_dir)
    }

    /// Unit vector from the center towards the point at angle `t`.
    fn radial(&self, t: f64) -> Vector3 {
        self.ref_dir * t.cos() + self.binormal() * t.sin()
    }
}

impl Curve for Arc {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        self.domain().check(t)?;
        Ok(self.center + self.radial(t) * self.radius)
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        self.domain().check(t)?;
        Ok(self.normal.cross(&self.radial(t)) * self.radius)
    }

    fn second_derivative(&self, t: f64) -> Result<Vector3> {
        self.domain().check(t)?;
        Ok(-self.radial(t) * self.radius)
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        self.domain().check(t)?;
        Ok(self.normal.cross(&self.radial(t)))
    }

    fn curvature(&self, t: f64) -> Result<Vector3> {
        self.domain().check(t)?;
        Ok(-self.radial(t) / self.radius)
    }

    fn length(&self, t0: f64, t1: f64) -> Result<f64> {
        self.domain().check(t0)?;
        self.domain().check(t1)?;
        Ok(self.radius * (t1 - t0).abs())
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(self.start_angle, self.end_angle)
    }

    fn is_closed(&self) -> bool {
        (self.end_angle - self.start_angle - std::f64::consts::TAU).abs() < TOLERANCE
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, TAU};

    fn unit_circle() -> Arc {
        Arc::new(Point3::origin(), 1.0, Vector3::z(), Vector3::x(), 0.0, TAU).unwrap()
    }

    #[test]
    fn evaluate_quarter_turn() {
        let p = unit_circle().evaluate(FRAC_PI_2).unwrap();
        assert!((p - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let arc = Arc::new(
            Point3::new(1.0, 2.0, 3.0),
            2.5,
            Vector3::new(0.0, 1.0, 1.0),
            Vector3::x(),
            0.0,
            3.0,
        )
        .unwrap();
        let (t, h) = (1.2, 1e-5);
        let fd1 = (arc.evaluate(t + h).unwrap() - arc.evaluate(t - h).unwrap()) / (2.0 * h);
        assert_relative_eq!(arc.derivative(t).unwrap(), fd1, epsilon = 1e-8);
        let fd2 =
            (arc.derivative(t + h).unwrap() - arc.derivative(t - h).unwrap()) / (2.0 * h);
        assert_relative_eq!(arc.second_derivative(t).unwrap(), fd2, epsilon = 1e-8);
    }

    #[test]
    fn curvature_points_to_center() {
        let arc = unit_circle();
        let k = arc.curvature(0.0).unwrap();
        assert_relative_eq!(k, Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn closed_full_circle() {
        assert!(unit_circle().is_closed());
        assert_relative_eq!(unit_circle().length(0.0, TAU).unwrap(), TAU);
    }

    #[test]
    fn out_of_range_parameter_fails() {
        let arc = Arc::new(Point3::origin(), 1.0, Vector3::z(), Vector3::x(), 0.0, 1.0).unwrap();
        assert!(arc.evaluate(1.5).is_err());
        assert!(arc.derivative(-0.5).is_err());
    }

    #[test]
    fn invalid_radius() {
        let r = Arc::new(Point3::origin(), 0.0, Vector3::z(), Vector3::x(), 0.0, 1.0);
        assert!(r.is_err());
    }
}
