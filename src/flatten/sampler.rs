use crate::error::{GeometryError, Result};
use crate::geometry::curve::Curve;
use crate::math::TOLERANCE;
use crate::tessellation::{TessellateCurve, TessellationParams};

/// Relative inset applied to both parameter extents.
const ENDPOINT_INSET: f64 = 1e-13;

/// Parameter nodes approximately evenly spaced in arc length.
///
/// The curve is tessellated into chordal strokes; the cumulative chord
/// distance `d_i` of each stroke point maps to `t0 + (t1 - t0) * d_i / d_n`.
/// This assumes near-constant parametric speed between strokes.
pub struct ArcLengthSampler<'a> {
    curve: &'a dyn Curve,
    t0: f64,
    t1: f64,
    strokes: TessellationParams,
}

impl<'a> ArcLengthSampler<'a> {
    /// Creates a sampler over `[t0, t1]` with the given stroke tolerance.
    #[must_use]
    pub fn new(curve: &'a dyn Curve, t0: f64, t1: f64, strokes: TessellationParams) -> Self {
        Self {
            curve,
            t0,
            t1,
            strokes,
        }
    }

    /// Returns strictly increasing nodes from just after `t0` to just before `t1`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ParameterOutOfRange`] for non-finite extents,
    /// [`GeometryError::Degenerate`] for an empty range,
    /// [`GeometryError::DegenerateCurve`] when the strokes have zero length,
    /// and propagates evaluator failures.
    pub fn execute(&self) -> Result<Vec<f64>> {
        for (parameter, value) in [("t0", self.t0), ("t1", self.t1)] {
            if !value.is_finite() {
                return Err(GeometryError::ParameterOutOfRange {
                    parameter,
                    value,
                    min: f64::MIN,
                    max: f64::MAX,
                }
                .into());
            }
        }
        let span = self.t1 - self.t0;
        if span <= 0.0 {
            return Err(GeometryError::Degenerate(format!(
                "empty parameter extents [{}, {}]",
                self.t0, self.t1
            ))
            .into());
        }

        let strokes = TessellateCurve::new(self.curve, self.t0, self.t1, self.strokes).execute()?;
        let mut distances = Vec::with_capacity(strokes.points.len());
        let mut total = 0.0;
        distances.push(total);
        for pair in strokes.points.windows(2) {
            let step = (pair[1] - pair[0]).norm();
            if step > 0.0 {
                total += step;
                distances.push(total);
            }
        }
        if total <= TOLERANCE * span.max(1.0) {
            return Err(GeometryError::DegenerateCurve { parameter: self.t0 }.into());
        }

        let inset = ENDPOINT_INSET * span;
        let last = distances.len() - 1;
        let nodes = distances
            .iter()
            .enumerate()
            .map(|(i, d)| {
                if i == 0 {
                    self.t0 + inset
                } else if i == last {
                    self.t1 - inset
                } else {
                    self.t0 + span * (d / total)
                }
            })
            .collect();
        Ok(nodes)
    }
}
