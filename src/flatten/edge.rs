use nalgebra::Rotation2;
use tracing::{debug, warn};

use crate::error::{AssemblyError, GeometryError, Result};
use crate::geometry::curve::Curve;
use crate::geometry::surface::Surface;
use crate::math::ode23::{Ode23, StepControl};
use crate::math::polygon_2d::cumulative_lengths;
use crate::math::{Point2, Vector2, Vector4, TOLERANCE};

use super::field::GeodesicField;
use super::sampler::ArcLengthSampler;
use super::FlattenParams;

/// The planar image of one curve, with its tangent at every node.
///
/// Points and tangents are exclusively owned and mutated in place during
/// assembly. While `needs_reverse` is set they are still in the curve's
/// parameter order; [`FlattenedEdge::orient_to_loop`] brings them into
/// loop order.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedEdge {
    points: Vec<Point2>,
    tangents: Vec<Vector2>,
    length3d: f64,
    needs_reverse: bool,
}

impl FlattenedEdge {
    /// Creates an edge from matching point and tangent sequences.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::EmptyEdge`] without points and
    /// [`AssemblyError::TangentCountMismatch`] when the counts differ.
    pub fn new(
        points: Vec<Point2>,
        tangents: Vec<Vector2>,
        length3d: f64,
        needs_reverse: bool,
    ) -> Result<Self> {
        if points.is_empty() {
            return Err(AssemblyError::EmptyEdge.into());
        }
        if points.len() != tangents.len() {
            return Err(AssemblyError::TangentCountMismatch {
                points: points.len(),
                tangents: tangents.len(),
            }
            .into());
        }
        Ok(Self {
            points,
            tangents,
            length3d,
            needs_reverse,
        })
    }

    /// The planar points.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// The planar tangent (velocity) at every point.
    #[must_use]
    pub fn tangents(&self) -> &[Vector2] {
        &self.tangents
    }

    /// True arc length of the source curve.
    #[must_use]
    pub fn length3d(&self) -> f64 {
        self.length3d
    }

    /// Replaces the target length used by [`FlattenedEdge::correct_length`].
    pub fn set_length3d(&mut self, length3d: f64) {
        self.length3d = length3d;
    }

    /// Whether the points still run against the loop direction.
    #[must_use]
    pub fn needs_reverse(&self) -> bool {
        self.needs_reverse
    }

    /// First point.
    #[must_use]
    pub fn first_point(&self) -> Point2 {
        self.points[0]
    }

    /// Last point.
    #[must_use]
    pub fn last_point(&self) -> Point2 {
        self.points[self.points.len() - 1]
    }

    /// Direction of the first tangent, `atan2(vy, vx)`.
    #[must_use]
    pub fn start_angle(&self) -> f64 {
        let t = self.tangents[0];
        t.y.atan2(t.x)
    }

    /// Direction of the last tangent, `atan2(vy, vx)`.
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        let t = self.tangents[self.tangents.len() - 1];
        t.y.atan2(t.x)
    }

    /// Cumulative point-to-point length of the polyline.
    #[must_use]
    pub fn length_2d(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).norm())
            .sum()
    }

    /// Stretches the polyline so its length matches `length3d`.
    ///
    /// With `delta = length3d - L2d`, point `i >= 1` moves along its unit
    /// tangent by `delta * l_i / L2d`, where `l_i` is the cumulative length
    /// up to that point. Must run in integration order. Polylines without
    /// length and points with a vanishing tangent are left in place.
    pub fn correct_length(&mut self) {
        let lengths = cumulative_lengths(&self.points);
        let length_2d = lengths[lengths.len() - 1];
        if length_2d <= TOLERANCE {
            return;
        }
        let delta = self.length3d - length_2d;
        for ((point, tangent), l) in self
            .points
            .iter_mut()
            .zip(&self.tangents)
            .zip(&lengths)
            .skip(1)
        {
            if let Some(dir) = tangent.try_normalize(TOLERANCE) {
                *point += dir * (delta * l / length_2d);
            }
        }
    }

    /// Reverses the traversal direction and toggles `needs_reverse`.
    ///
    /// Point and tangent order are reversed and tangents negated, which
    /// turns both boundary angles by 180 degrees. Applying it twice
    /// restores the edge exactly.
    pub fn reverse(&mut self) {
        self.points.reverse();
        self.tangents.reverse();
        for t in &mut self.tangents {
            *t = -*t;
        }
        self.needs_reverse = !self.needs_reverse;
    }

    /// Reverses the edge if flagged, then moves its first point to the origin.
    pub fn orient_to_loop(&mut self) {
        if self.needs_reverse {
            self.reverse();
        }
        self.translate_to(&Point2::origin());
    }

    /// Rotates points and tangents by `angle` about the first point.
    pub fn rotate(&mut self, angle: f64) {
        let center = self.first_point();
        self.rotate_about(&center, angle);
    }

    /// Rotates points and tangents by `angle` about `center`.
    pub fn rotate_about(&mut self, center: &Point2, angle: f64) {
        let rotation = Rotation2::new(angle);
        for p in &mut self.points {
            *p = center + rotation * (*p - center);
        }
        for t in &mut self.tangents {
            *t = rotation * *t;
        }
    }

    /// Moves every point by `offset`.
    pub fn translate(&mut self, offset: &Vector2) {
        for p in &mut self.points {
            *p += offset;
        }
    }

    /// Moves the edge so its first point lands on `target`.
    pub fn translate_to(&mut self, target: &Point2) {
        let offset = target - self.first_point();
        self.translate(&offset);
    }
}

/// Flattens one curve lying on a developable surface.
///
/// The curve is sampled at near-uniform arc length, then the geodesic field
/// is integrated from `(0, 0, |r'(s0)|, 0)`: the image starts at the origin
/// heading along +X at the true parametric speed. The result stays in
/// integration order; `forward = false` only sets `needs_reverse`.
pub struct FlattenEdge<'a> {
    curve: &'a dyn Curve,
    surface: &'a dyn Surface,
    t_start: f64,
    t_end: f64,
    forward: bool,
    params: FlattenParams,
    length3d: Option<f64>,
}

impl<'a> FlattenEdge<'a> {
    /// Creates a new `FlattenEdge` operation over `[t_start, t_end]`.
    #[must_use]
    pub fn new(curve: &'a dyn Curve, surface: &'a dyn Surface, t_start: f64, t_end: f64) -> Self {
        Self {
            curve,
            surface,
            t_start,
            t_end,
            forward: true,
            params: FlattenParams::default(),
            length3d: None,
        }
    }

    /// Sets whether the owning coedge follows the curve's parametrization.
    #[must_use]
    pub fn with_forward(mut self, forward: bool) -> Self {
        self.forward = forward;
        self
    }

    /// Sets stroke and step-control parameters.
    #[must_use]
    pub fn with_params(mut self, params: &FlattenParams) -> Self {
        self.params = *params;
        self
    }

    /// Overrides the measured 3D length instead of asking the curve.
    #[must_use]
    pub fn with_length3d(mut self, length3d: f64) -> Self {
        self.length3d = Some(length3d);
        self
    }

    /// Executes the flattening.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateCurve`] for zero parametric speed,
    /// [`IntegrationError::Divergence`](crate::error::IntegrationError::Divergence)
    /// when subdivision cannot meet the tolerance, and propagates sampler and
    /// evaluator failures.
    pub fn execute(&self) -> Result<FlattenedEdge> {
        let nodes = ArcLengthSampler::new(self.curve, self.t_start, self.t_end, self.params.strokes)
            .execute()?;

        let speed = self.curve.derivative(nodes[0])?.norm();
        if speed < TOLERANCE {
            return Err(GeometryError::DegenerateCurve {
                parameter: nodes[0],
            }
            .into());
        }

        let field = GeodesicField::new(self.curve, self.surface);
        let x0 = Vector4::new(0.0, 0.0, speed, 0.0);
        let control = self.params.step_control;
        let solution = Ode23::new(&nodes, x0)
            .with_control(control)
            .execute(|t, x| field.rate(t, x))?;

        let solution = match control {
            StepControl::Subdivided { .. } => solution.converged()?,
            StepControl::Validated { .. } if !solution.success => {
                warn!(
                    t_start = self.t_start,
                    t_end = self.t_end,
                    "flattened edge failed the local error check"
                );
                solution
            }
            _ => solution,
        };

        let length3d = match self.length3d {
            Some(length) => length,
            None => self.curve.length(self.t_start, self.t_end)?,
        };
        debug!(
            nodes = nodes.len(),
            length3d,
            subdivisions = solution.subdivisions,
            "flattened edge"
        );

        let (points, tangents) = solution
            .states
            .iter()
            .map(|x| (Point2::new(x[0], x[1]), Vector2::new(x[2], x[3])))
            .unzip();
        FlattenedEdge::new(points, tangents, length3d, !self.forward)
    }
}
