use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Surface, SurfaceDomain};

/// An infinite plane, its own development.
///
/// `P(u, v) = origin + u * u_dir + v * v_dir` with an orthonormal
/// `(u_dir, v_dir)` and normal `u_dir x v_dir`. Curves on a plane have
/// geodesic curvature equal to their plane curvature, so they flatten to
/// congruent copies of themselves.
#[derive(Debug, Clone)]
pub struct Plane {
    origin: Point3,
    u_dir: Vector3,
    v_dir: Vector3,
}

impl Plane {
    /// Creates a plane spanned by `u_dir` and `v_dir`.
    ///
    /// `v_dir` is made orthogonal to `u_dir` within the span, which keeps the
    /// normal side.
    ///
    /// # Errors
    ///
    /// Returns an error if a direction has no length or both are parallel.
    pub fn new(origin: Point3, u_dir: Vector3, v_dir: Vector3) -> Result<Self> {
        let u_dir = u_dir.try_normalize(TOLERANCE).ok_or(GeometryError::ZeroVector)?;
        if v_dir.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let v_dir = (v_dir - u_dir * v_dir.dot(&u_dir))
            .try_normalize(TOLERANCE)
            .ok_or_else(|| GeometryError::Degenerate("plane directions are parallel".into()))?;
        Ok(Self {
            origin,
            u_dir,
            v_dir,
        })
    }

    /// Creates the plane through `origin` facing `normal`, with an arbitrary
    /// in-plane frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal has no length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let normal = normal.try_normalize(TOLERANCE).ok_or(GeometryError::ZeroVector)?;
        let seed = if normal.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let u_dir = (seed - normal * seed.dot(&normal)).normalize();
        Ok(Self {
            origin,
            u_dir,
            v_dir: normal.cross(&u_dir),
        })
    }
}

impl Surface for Plane {
    fn evaluate(&self, u: f64, v: f64) -> Result<Point3> {
        Ok(self.origin + self.u_dir * u + self.v_dir * v)
    }

    fn normal(&self, _u: f64, _v: f64) -> Result<Vector3> {
        Ok(self.u_dir.cross(&self.v_dir))
    }

    fn normal_at_point(&self, _point: &Point3) -> Result<Vector3> {
        Ok(self.u_dir.cross(&self.v_dir))
    }

    fn domain(&self) -> SurfaceDomain {
        SurfaceDomain::new(f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_normal_faces_the_normal() {
        for n in [Vector3::new(0.0, 0.0, 3.0), Vector3::new(2.0, 0.1, 0.0)] {
            let p = Plane::from_normal(Point3::new(0.0, 0.0, 2.0), n).unwrap();
            let got = p.normal_at_point(&Point3::origin()).unwrap();
            assert_relative_eq!(got, n.normalize(), epsilon = 1e-12);
            let q = p.evaluate(1.0, 1.0).unwrap() - Point3::new(0.0, 0.0, 2.0);
            assert!(q.dot(&n).abs() < 1e-12);
        }
    }

    #[test]
    fn skewed_directions_keep_the_normal_side() {
        let p = Plane::new(Point3::origin(), Vector3::x(), Vector3::new(1.0, 2.0, 0.0)).unwrap();
        assert_relative_eq!(p.normal(0.3, 0.4).unwrap(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(p.evaluate(0.0, 1.0).unwrap(), Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn parallel_directions_fail() {
        assert!(Plane::new(Point3::origin(), Vector3::x(), Vector3::x() * 2.0).is_err());
        assert!(Plane::from_normal(Point3::origin(), Vector3::zeros()).is_err());
    }
}
