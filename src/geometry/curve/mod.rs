mod arc;
mod helix;
mod line;

pub use arc::Arc;
pub use helix::Helix;
pub use line::Line;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Length of the parameter range.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.t_max - self.t_min
    }

    /// Checks that `t` lies within the domain, allowing [`TOLERANCE`] of slack.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ParameterOutOfRange`] if `t` is outside the
    /// domain or not a number.
    pub fn check(&self, t: f64) -> Result<()> {
        if t >= self.t_min - TOLERANCE && t <= self.t_max + TOLERANCE {
            Ok(())
        } else {
            Err(GeometryError::ParameterOutOfRange {
                parameter: "t",
                value: t,
                min: self.t_min,
                max: self.t_max,
            }
            .into())
        }
    }
}

/// Trait for parametric curves in 3D space.
///
/// This is the curve half of the geometry evaluation service consumed by the
/// flattening pipeline. Methods fail with a [`GeometryError`] when the
/// parameter lies outside [`Curve::domain`].
pub trait Curve {
    /// Evaluates the curve at parameter `t`, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range or evaluation fails.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// First derivative `r'(t)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range.
    fn derivative(&self, t: f64) -> Result<Vector3>;

    /// Second derivative `r''(t)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range.
    fn second_derivative(&self, t: f64) -> Result<Vector3>;

    /// Computes the unit tangent vector at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range or the tangent is degenerate.
    fn tangent(&self, t: f64) -> Result<Vector3>;

    /// Curvature vector `kappa * N` at parameter `t`.
    ///
    /// The default implementation uses `(r'' - (r'' . T) T) / |r'|^2`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateCurve`] where the parametric speed vanishes.
    fn curvature(&self, t: f64) -> Result<Vector3> {
        let d1 = self.derivative(t)?;
        let d2 = self.second_derivative(t)?;
        let speed_sq = d1.norm_squared();
        if speed_sq < TOLERANCE * TOLERANCE {
            return Err(GeometryError::DegenerateCurve { parameter: t }.into());
        }
        let tangent = d1 / speed_sq.sqrt();
        Ok((d2 - tangent * d2.dot(&tangent)) / speed_sq)
    }

    /// Arc length between parameters `t0` and `t1`.
    ///
    /// The default implementation integrates `|r'(t)|` with composite
    /// five-point Gauss-Legendre quadrature.
    ///
    /// # Errors
    ///
    /// Returns an error if either parameter is out of range.
    fn length(&self, t0: f64, t1: f64) -> Result<f64> {
        gauss_legendre_length(self, t0, t1)
    }

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Returns whether the curve is closed.
    fn is_closed(&self) -> bool;
}

const GAUSS_PANELS: usize = 32;

const GAUSS_NODES: [(f64, f64); 5] = [
    (0.0, 0.568_888_888_888_888_9),
    (-0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (-0.906_179_845_938_664_0, 0.236_926_885_056_189_1),
    (0.906_179_845_938_664_0, 0.236_926_885_056_189_1),
];

fn gauss_legendre_length<C: Curve + ?Sized>(curve: &C, t0: f64, t1: f64) -> Result<f64> {
    curve.domain().check(t0)?;
    curve.domain().check(t1)?;
    #[allow(clippy::cast_precision_loss)]
    let panel = (t1 - t0) / GAUSS_PANELS as f64;
    let mut total = 0.0;
    for i in 0..GAUSS_PANELS {
        #[allow(clippy::cast_precision_loss)]
        let mid = t0 + panel * (i as f64 + 0.5);
        for &(x, w) in &GAUSS_NODES {
            total += w * curve.derivative(mid + 0.5 * panel * x)?.norm();
        }
    }
    Ok((0.5 * panel * total).abs())
}
