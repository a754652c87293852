use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::{AssemblyError, Result};
use crate::math::polygon_2d::{principal_axis_angle, Aabb2};
use crate::math::Point2;

use super::edge::FlattenedEdge;

/// The flattened edges of one face boundary, in loop order.
///
/// `rel_angles[i]` is the signed turning angle, measured on the surface,
/// from the outgoing tangent of edge `i - 1` to the incoming tangent of
/// edge `i`; index 0 is the wrap-around corner. Bounds and closure error
/// are derived and recomputed from every point after geometric changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    edges: Vec<FlattenedEdge>,
    rel_angles: Vec<f64>,
    bounds: Aabb2,
    closure_error: f64,
}

impl Loop {
    /// Creates a loop from its edges and corner angles.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::EmptyLoop`] without edges and
    /// [`AssemblyError::AngleCountMismatch`] unless there is one angle per edge.
    pub fn new(edges: Vec<FlattenedEdge>, rel_angles: Vec<f64>) -> Result<Self> {
        if edges.is_empty() {
            return Err(AssemblyError::EmptyLoop.into());
        }
        if edges.len() != rel_angles.len() {
            return Err(AssemblyError::AngleCountMismatch {
                edges: edges.len(),
                angles: rel_angles.len(),
            }
            .into());
        }
        let mut lp = Self {
            edges,
            rel_angles,
            bounds: Aabb2 {
                min: Point2::origin(),
                max: Point2::origin(),
            },
            closure_error: 0.0,
        };
        lp.recompute();
        Ok(lp)
    }

    /// The edges in loop order.
    #[must_use]
    pub fn edges(&self) -> &[FlattenedEdge] {
        &self.edges
    }

    pub(crate) fn edges_mut(&mut self) -> &mut [FlattenedEdge] {
        &mut self.edges
    }

    /// Corner angles, one per edge.
    #[must_use]
    pub fn rel_angles(&self) -> &[f64] {
        &self.rel_angles
    }

    /// Bounding box over every point of every edge.
    #[must_use]
    pub fn bounds(&self) -> Aabb2 {
        self.bounds
    }

    /// Distance from the last point of the last edge to the first point of
    /// the first edge.
    #[must_use]
    pub fn closure_error(&self) -> f64 {
        self.closure_error
    }

    /// Iterates every point of every edge.
    pub fn points(&self) -> impl Iterator<Item = &Point2> + Clone {
        self.edges.iter().flat_map(|e| e.points().iter())
    }

    /// Rotates the loop so the principal axis of its points is vertical,
    /// then moves the bounding box minimum to the origin.
    ///
    /// The rotation is folded into `(-pi/2, pi/2]`, so a loop that is
    /// already vertical does not move.
    pub fn orient_vertical(&mut self) {
        let Some(theta) = principal_axis_angle(self.points()) else {
            return;
        };
        let mut angle = FRAC_PI_2 - theta;
        if angle > FRAC_PI_2 {
            angle -= PI;
        } else if angle <= -FRAC_PI_2 {
            angle += PI;
        }
        let origin = Point2::origin();
        for edge in &mut self.edges {
            edge.rotate_about(&origin, angle);
        }
        self.recompute();
        let offset = origin - self.bounds.min;
        for edge in &mut self.edges {
            edge.translate(&offset);
        }
        self.recompute();
    }

    /// Recomputes bounds and closure error from the current points.
    pub fn recompute(&mut self) {
        if let Some(bounds) = Aabb2::from_points(self.points()) {
            self.bounds = bounds;
        }
        if let (Some(first), Some(last)) = (self.edges.first(), self.edges.last()) {
            self.closure_error = (last.last_point() - first.first_point()).norm();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::UnfurlError;
    use crate::math::Vector2;

    fn segment(from: Point2, to: Point2) -> FlattenedEdge {
        let d = to - from;
        FlattenedEdge::new(vec![from, to], vec![d, d], d.norm(), false).unwrap()
    }

    #[test]
    fn bounds_cover_every_edge() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, -1.0);
        let c = Point2::new(1.0, 3.0);
        let lp = Loop::new(
            vec![segment(a, b), segment(b, c), segment(c, a)],
            vec![0.0; 3],
        )
        .unwrap();
        assert_eq!(lp.bounds().to_array(), [0.0, -1.0, 2.0, 3.0]);
        assert!(lp.closure_error() < 1e-15);
    }

    #[test]
    fn recompute_follows_geometry() {
        let mut lp = Loop::new(
            vec![segment(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0))],
            vec![0.0],
        )
        .unwrap();
        assert!((lp.closure_error() - 1.0).abs() < 1e-15);
        lp.edges_mut()[0].translate(&Vector2::new(3.0, 4.0));
        lp.recompute();
        assert_eq!(lp.bounds().to_array(), [3.0, 4.0, 4.0, 4.0]);
    }

    fn rectangle(width: f64, height: f64) -> Loop {
        let c = [
            Point2::new(0.0, 0.0),
            Point2::new(width, 0.0),
            Point2::new(width, height),
            Point2::new(0.0, height),
        ];
        Loop::new(
            (0..4).map(|i| segment(c[i], c[(i + 1) % 4])).collect(),
            vec![std::f64::consts::FRAC_PI_2; 4],
        )
        .unwrap()
    }

    #[test]
    fn vertical_loop_is_a_fixed_point() {
        let original = rectangle(1.0, 4.0);
        let mut lp = original.clone();
        lp.orient_vertical();
        for (a, b) in lp.points().zip(original.points()) {
            assert!((a - b).norm() < 1e-12, "{b} moved to {a}");
        }
    }

    #[test]
    fn horizontal_loop_turns_upright() {
        let mut lp = rectangle(4.0, 1.0);
        lp.orient_vertical();
        let bounds = lp.bounds();
        assert!((bounds.width() - 1.0).abs() < 1e-12);
        assert!((bounds.height() - 4.0).abs() < 1e-12);
        assert!(bounds.min.coords.norm() < 1e-12);
    }

    #[test]
    fn counts_are_checked() {
        let e = segment(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        assert!(matches!(
            Loop::new(vec![], vec![]).unwrap_err(),
            UnfurlError::Assembly(AssemblyError::EmptyLoop)
        ));
        assert!(matches!(
            Loop::new(vec![e], vec![0.0, 1.0]).unwrap_err(),
            UnfurlError::Assembly(AssemblyError::AngleCountMismatch { edges: 1, angles: 2 })
        ));
    }
}
