use crate::error::{GeometryError, Result};
use crate::math::{orthonormal_frame, Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceDomain};

/// One nappe of a circular cone.
///
/// `P(u, v) = apex + v * (cos(alpha) * axis + sin(alpha) * (cos(u) * ref_dir + sin(u) * binormal))`
/// with `binormal = axis x ref_dir` and half-angle `alpha`; `v >= 0` is the
/// distance from the apex along a generator.
///
/// Unrolled, the cone becomes a circular sector centred on the apex image:
/// a point keeps its slant radius `v` and a turn of `u` about the axis
/// opens an angle of `u * sin(alpha)`.
#[derive(Debug, Clone)]
pub struct Cone {
    apex: Point3,
    axis: Vector3,
    ref_dir: Vector3,
    binormal: Vector3,
    half_angle: f64,
}

impl Cone {
    /// Creates a cone opening along `axis` from `apex`.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < half_angle < pi/2` and `axis`, `ref_dir`
    /// form a frame.
    pub fn new(apex: Point3, axis: Vector3, half_angle: f64, ref_dir: Vector3) -> Result<Self> {
        if !(half_angle > TOLERANCE && half_angle < std::f64::consts::FRAC_PI_2 - TOLERANCE) {
            return Err(GeometryError::Degenerate(format!(
                "cone half-angle {half_angle} outside (0, pi/2)"
            ))
            .into());
        }
        let (axis, ref_dir, binormal) = orthonormal_frame(&axis, &ref_dir)?;
        Ok(Self {
            apex,
            axis,
            ref_dir,
            binormal,
            half_angle,
        })
    }

    #[must_use]
    pub fn apex(&self) -> &Point3 {
        &self.apex
    }

    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    #[must_use]
    pub fn half_angle(&self) -> f64 {
        self.half_angle
    }

    /// Distance from the apex, which is the radius of the point's image in
    /// the development.
    #[must_use]
    pub fn slant_radius(&self, point: &Point3) -> f64 {
        (point - self.apex).norm()
    }

    /// Opening angle of the development of a sector spanning `sweep`
    /// radians about the axis.
    #[must_use]
    pub fn developed_sweep(&self, sweep: f64) -> f64 {
        sweep * self.half_angle.sin()
    }
}

impl Surface for Cone {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let radial = self.ref_dir * u.cos() + self.binormal * u.sin();
        let (sin, cos) = self.half_angle.sin_cos();
        Ok(self.apex + (self.axis * cos + radial * sin) * v)
    }

    fn normal(&self, u: f64, v: f64) -> Result<Vector3> {
        self.normal_at_point(&self.evaluate(u, v)?)
    }

    /// Outward normal `cos(alpha) * radial - sin(alpha) * axis`, with
    /// `radial` the unit direction from the axis to the point.
    fn normal_at_point(&self, point: &Point3) -> Result<Vector3> {
        let d = point - self.apex;
        let radial = (d - self.axis * d.dot(&self.axis))
            .try_normalize(TOLERANCE)
            .ok_or_else(|| {
                GeometryError::Degenerate("cone normal is undefined on its axis".into())
            })?;
        let (sin, cos) = self.half_angle.sin_cos();
        Ok(radial * cos - self.axis * sin)
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(0.0, std::f64::consts::TAU, 0.0, f64::INFINITY)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6, PI};

    fn z_cone_45() -> Cone {
        Cone::new(Point3::origin(), Vector3::z(), FRAC_PI_4, Vector3::x()).unwrap()
    }

    #[test]
    fn generator_points_keep_their_slant_radius() {
        let c = z_cone_45();
        let p = c.evaluate(FRAC_PI_2, 2.0).unwrap();
        let s = 2.0 * FRAC_PI_4.sin();
        assert_relative_eq!(p, Point3::new(0.0, s, s), epsilon = 1e-12);
        assert_relative_eq!(c.slant_radius(&p), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn normal_is_outward_and_perpendicular_to_generator() {
        let c = z_cone_45();
        let p = Point3::new(0.0, 1.0, 1.0);
        let n = c.normal_at_point(&p).unwrap();
        assert!(n.dot(&p.coords).abs() < 1e-12);
        assert!(n.y > 0.0 && n.z < 0.0);
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn normal_follows_the_axis_direction() {
        let c = Cone::new(Point3::new(0.0, 0.0, 2.0), -Vector3::z(), FRAC_PI_6, Vector3::x())
            .unwrap();
        let n = c.normal(0.0, 1.0).unwrap();
        assert_relative_eq!(n, Vector3::new(FRAC_PI_6.cos(), 0.0, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn normal_on_axis_fails() {
        let c = z_cone_45();
        assert!(c.normal_at_point(&Point3::origin()).is_err());
        assert!(c.normal(1.0, 0.0).is_err());
    }

    #[test]
    fn development_angle_scales_with_half_angle() {
        let c = Cone::new(Point3::origin(), Vector3::z(), FRAC_PI_6, Vector3::x()).unwrap();
        assert_relative_eq!(c.developed_sweep(PI), 0.5 * PI, epsilon = 1e-12);
    }

    #[test]
    fn invalid_half_angles() {
        for angle in [0.0, FRAC_PI_2, -0.3, f64::NAN] {
            assert!(Cone::new(Point3::origin(), Vector3::z(), angle, Vector3::x()).is_err());
        }
    }
}
