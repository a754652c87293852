use crate::error::{GeometryError, Result};
use crate::geometry::curve::Curve;
use crate::math::Point3;

use super::{Polyline, TessellationParams};

/// Tessellates a curve into chordal strokes.
///
/// Starts from `min_segments` uniform parameter spans and bisects every span
/// whose midpoint lies farther than `tolerance` from its chord, until no
/// span needs refinement or `max_segments` is reached.
pub struct TessellateCurve<'a> {
    curve: &'a dyn Curve,
    t_start: f64,
    t_end: f64,
    params: TessellationParams,
}

impl<'a> TessellateCurve<'a> {
    /// Creates a new `TessellateCurve` operation over `[t_start, t_end]`.
    #[must_use]
    pub fn new(curve: &'a dyn Curve, t_start: f64, t_end: f64, params: TessellationParams) -> Self {
        Self {
            curve,
            t_start,
            t_end,
            params,
        }
    }

    /// Executes the tessellation, returning a polyline.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid, the range is empty or
    /// the curve cannot be evaluated inside it.
    pub fn execute(&self) -> Result<Polyline> {
        self.params.validate()?;
        if !(self.t_start.is_finite() && self.t_end.is_finite() && self.t_start < self.t_end) {
            return Err(GeometryError::Degenerate(format!(
                "cannot tessellate parameter range [{}, {}]",
                self.t_start, self.t_end
            ))
            .into());
        }

        let n = self.params.min_segments;
        let span = self.t_end - self.t_start;
        let mut params: Vec<f64> = (0..=n)
            .map(|i| {
                if i == n {
                    self.t_end
                } else {
                    #[allow(clippy::cast_precision_loss)]
                    let f = i as f64 / n as f64;
                    self.t_start + span * f
                }
            })
            .collect();
        let mut points = params
            .iter()
            .map(|&t| self.curve.evaluate(t))
            .collect::<Result<Vec<_>>>()?;

        while params.len() - 1 < self.params.max_segments {
            let mut segments = params.len() - 1;
            let mut next_params = Vec::with_capacity(params.len() * 2);
            let mut next_points = Vec::with_capacity(points.len() * 2);
            next_params.push(params[0]);
            next_points.push(points[0]);

            for i in 0..params.len() - 1 {
                if segments < self.params.max_segments {
                    let mid = 0.5 * (params[i] + params[i + 1]);
                    let p_mid = self.curve.evaluate(mid)?;
                    if distance_to_segment(&p_mid, &points[i], &points[i + 1])
                        > self.params.tolerance
                    {
                        next_params.push(mid);
                        next_points.push(p_mid);
                        segments += 1;
                    }
                }
                next_params.push(params[i + 1]);
                next_points.push(points[i + 1]);
            }

            let refined = next_params.len() > params.len();
            params = next_params;
            points = next_points;
            if !refined {
                break;
            }
        }

        Ok(Polyline { points })
    }
}

fn distance_to_segment(p: &Point3, a: &Point3, b: &Point3) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::curve::{Arc, Line};
    use crate::math::Vector3;
    use crate::tessellation::TessellationParams;
    use std::f64::consts::TAU;

    fn circle(radius: f64) -> Arc {
        Arc::new(Point3::origin(), radius, Vector3::z(), Vector3::x(), 0.0, TAU).unwrap()
    }

    #[test]
    fn straight_line_stays_at_min_segments() {
        let line = Line::new(Point3::origin(), Vector3::x()).unwrap();
        let poly = TessellateCurve::new(&line, 0.0, 3.0, TessellationParams::default())
            .execute()
            .unwrap();
        assert_eq!(poly.points.len(), 5);
        assert!((poly.length() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn circle_strokes_respect_tolerance() {
        let arc = circle(1.0);
        let params = TessellationParams::with_tolerance(0.01);
        let poly = TessellateCurve::new(&arc, 0.0, TAU, params).execute().unwrap();

        // Sagitta of each chord must be within tolerance.
        for w in poly.points.windows(2) {
            let chord = (w[1] - w[0]).norm();
            let sagitta = 1.0 - (1.0 - 0.25 * chord * chord).sqrt();
            assert!(sagitta <= 0.01 + 1e-12, "sagitta {sagitta}");
        }
        assert!(poly.length() < TAU);
        assert!(poly.length() > TAU * 0.99);
    }

    #[test]
    fn endpoints_are_exact() {
        let arc = circle(2.0);
        let poly = TessellateCurve::new(&arc, 0.5, 2.0, TessellationParams::default())
            .execute()
            .unwrap();
        assert!((poly.points[0] - arc.evaluate(0.5).unwrap()).norm() < 1e-15);
        let last = poly.points[poly.points.len() - 1];
        assert!((last - arc.evaluate(2.0).unwrap()).norm() < 1e-15);
    }

    #[test]
    fn max_segments_caps_refinement() {
        let arc = circle(100.0);
        let params = TessellationParams {
            tolerance: 1e-9,
            min_segments: 4,
            max_segments: 10,
        };
        let poly = TessellateCurve::new(&arc, 0.0, TAU, params).execute().unwrap();
        assert_eq!(poly.points.len(), 11);
    }

    #[test]
    fn invalid_params_fail() {
        let arc = circle(1.0);
        let params = TessellationParams {
            tolerance: 0.0,
            ..TessellationParams::default()
        };
        assert!(TessellateCurve::new(&arc, 0.0, 1.0, params).execute().is_err());
        assert!(TessellateCurve::new(&arc, 1.0, 1.0, TessellationParams::default())
            .execute()
            .is_err());
    }
}
