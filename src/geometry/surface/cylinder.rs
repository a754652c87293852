use crate::error::{GeometryError, Result};
use crate::math::{orthonormal_frame, Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceDomain};

/// A circular cylinder.
///
/// `P(u, v) = center + radius * (cos(u) * ref_dir + sin(u) * binormal) + v * axis`
/// with `binormal = axis x ref_dir`. It unrolls onto the plane with `u`
/// mapped to arc length `radius * u` and `v` unchanged.
#[derive(Debug, Clone)]
pub struct Cylinder {
    center: Point3,
    radius: f64,
    axis: Vector3,
    ref_dir: Vector3,
    binormal: Vector3,
}

impl Cylinder {
    /// Creates a cylinder around the axis through `center`.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or `axis` and `ref_dir`
    /// do not form a frame.
    pub fn new(center: Point3, radius: f64, axis: Vector3, ref_dir: Vector3) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("cylinder radius must be positive".into()).into());
        }
        let (axis, ref_dir, binormal) = orthonormal_frame(&axis, &ref_dir)?;
        Ok(Self {
            center,
            radius,
            axis,
            ref_dir,
            binormal,
        })
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    /// Component of `point - center` perpendicular to the axis.
    fn radial_offset(&self, point: &Point3) -> Vector3 {
        let d = point - self.center;
        d - self.axis * d.dot(&self.axis)
    }
}

impl Surface for Cylinder {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        let radial = self.ref_dir * u.cos() + self.binormal * u.sin();
        Ok(self.center + radial * self.radius + self.axis * v)
    }

    fn normal(&self, u: f64, v: f64) -> Result<Vector3> {
        self.normal_at_point(&self.evaluate(u, v)?)
    }

    /// Outward radial direction. Points off the surface are projected along
    /// the radial line, so only points on the axis fail.
    fn normal_at_point(&self, point: &Point3) -> Result<Vector3> {
        self.radial_offset(point).try_normalize(TOLERANCE).ok_or_else(|| {
            GeometryError::Degenerate("cylinder normal is undefined on its axis".into()).into()
        })
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(0.0, std::f64::consts::TAU, f64::NEG_INFINITY, f64::INFINITY)
    }
}
