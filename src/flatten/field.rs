use crate::error::{GeometryError, Result};
use crate::geometry::curve::Curve;
use crate::geometry::surface::Surface;
use crate::math::{Vector4, TOLERANCE};

/// Rate of change of the flattening state `(x, y, vx, vy)` along a curve
/// lying on a developable surface.
///
/// `d/dt (x, y, vx, vy) = (vx, vy, A vx - B vy, A vy + B vx)` with
/// `A = (r' . r'') / (r' . r')`, the log-rate of the parametric speed, and
/// `B = kappa_g |r'|`, the turning rate of the tangent in the plane.
/// The geodesic curvature `kappa_g = kappa . (n x T)` is signed about the
/// surface normal: a left turn is positive.
pub struct GeodesicField<'a> {
    curve: &'a dyn Curve,
    surface: &'a dyn Surface,
}

impl<'a> GeodesicField<'a> {
    /// Creates the field of `curve` on `surface`.
    #[must_use]
    pub fn new(curve: &'a dyn Curve, surface: &'a dyn Surface) -> Self {
        Self { curve, surface }
    }

    /// Returns the coefficients `(A, B)` at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateCurve`] where `r' . r'` vanishes and
    /// propagates evaluator failures.
    pub fn coefficients(&self, t: f64) -> Result<(f64, f64)> {
        let d1 = self.curve.derivative(t)?;
        let speed_sq = d1.norm_squared();
        if speed_sq < TOLERANCE * TOLERANCE {
            return Err(GeometryError::DegenerateCurve { parameter: t }.into());
        }
        let d2 = self.curve.second_derivative(t)?;
        let stretch = d1.dot(&d2) / speed_sq;

        let point = self.curve.evaluate(t)?;
        let normal = self.surface.normal_at_point(&point)?;
        let tangent = self.curve.tangent(t)?;
        let kappa = self.curve.curvature(t)?;
        let geodesic = kappa.dot(&normal.cross(&tangent));

        Ok((stretch, geodesic * speed_sq.sqrt()))
    }

    /// Evaluates the state derivative at `(t, x)`.
    ///
    /// # Errors
    ///
    /// See [`GeodesicField::coefficients`].
    pub fn rate(&self, t: f64, x: &Vector4) -> Result<Vector4> {
        let (a, b) = self.coefficients(t)?;
        let (vx, vy) = (x[2], x[3]);
        Ok(Vector4::new(vx, vy, a * vx - b * vy, a * vy + b * vx))
    }
}
