use crate::error::{GeometryError, Result};
use crate::math::{orthonormal_frame, Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// A circular helix.
///
/// `P(t) = center + radius * (cos(t) * ref_dir + sin(t) * binormal) + pitch * t * axis`
/// where `binormal = axis x ref_dir` and `pitch` is the axial rise per radian.
///
/// A helix lies on the cylinder of the same center, axis and radius.
#[derive(Debug, Clone)]
pub struct Helix {
    center: Point3,
    radius: f64,
    axis: Vector3,
    ref_dir: Vector3,
    pitch: f64,
    t_min: f64,
    t_max: f64,
}

impl Helix {
    /// Creates a new helix over the angle range `[t_min, t_max]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, the axis or reference
    /// direction is zero-length or not perpendicular, or the range is empty.
    pub fn new(
        center: Point3,
        radius: f64,
        axis: Vector3,
        ref_dir: Vector3,
        pitch: f64,
        t_min: f64,
        t_max: f64,
    ) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("helix radius must be positive".into()).into());
        }
        if t_max - t_min < TOLERANCE {
            return Err(GeometryError::Degenerate("helix range must be positive".into()).into());
        }
        let (axis, ref_dir, _) = orthonormal_frame(&axis, &ref_dir)?;
        Ok(Self {
            center,
            radius,
            axis,
            ref_dir,
            pitch,
            t_min,
            t_max,
        })
    }

    /// Returns the axial rise per radian.
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Constant parametric speed `sqrt(radius^2 + pitch^2)`.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.radius.hypot(self.pitch)
    }

    fn binormal(&self) -> Vector3 {
        self.axis.cross(&self.ref_dir)
    }

    fn radial(&self, t: f64) -> Vector3 {
        self.ref_dir * t.cos() + self.binormal() * t.sin()
    }
}

impl Curve for Helix {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        self.domain().check(t)?;
        Ok(self.center + self.radial(t) * self.radius + self.axis * (self.pitch * t))
    }

    fn derivative(&self, t: f64) -> Result<Vector3> {
        self.domain().check(t)?;
        Ok(self.axis.cross(&self.radial(t)) * self.radius + self.axis * self.pitch)
    }

    fn second_derivative(&self, t: f64) -> Result<Vector3> {
        self.domain().check(t)?;
        Ok(-self.radial(t) * self.radius)
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        Ok(self.derivative(t)? / self.speed())
    }

    fn length(&self, t0: f64, t1: f64) -> Result<f64> {
        self.domain().check(t0)?;
        self.domain().check(t1)?;
        Ok(self.speed() * (t1 - t0).abs())
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(self.t_min, self.t_max)
    }

    fn is_closed(&self) -> bool {
        false
    }
}
