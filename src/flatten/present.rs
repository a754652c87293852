use serde::{Deserialize, Serialize};

use crate::math::{Point2, Vector2};

use super::loops::Loop;

/// Receives the final planar polylines, one call per edge.
pub trait PresentationSink {
    /// Draws the points of edge `edge_index` of loop `loop_index`.
    fn draw_polyline(&mut self, loop_index: usize, edge_index: usize, points: &[Point2]);
}

/// One polyline handed to a [`PolylineCollector`].
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedPolyline {
    /// Index of the loop in the presented slice.
    pub loop_index: usize,
    /// Index of the edge within its loop.
    pub edge_index: usize,
    /// The points as drawn.
    pub points: Vec<Point2>,
}

/// A sink that keeps every polyline in memory.
#[derive(Debug, Clone, Default)]
pub struct PolylineCollector {
    /// Polylines in the order they were drawn.
    pub polylines: Vec<CollectedPolyline>,
}

impl PresentationSink for PolylineCollector {
    fn draw_polyline(&mut self, loop_index: usize, edge_index: usize, points: &[Point2]) {
        self.polylines.push(CollectedPolyline {
            loop_index,
            edge_index,
            points: points.to_vec(),
        });
    }
}

/// Direction along which successive loops are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Side by side.
    #[default]
    X,
    /// Stacked.
    Y,
}

/// Hands every edge of every loop to a sink, laying the loops out along
/// one axis so they do not overlap.
///
/// Loop `k` is shifted along `axis` so its bounds start where loop `k - 1`
/// ended, plus `gap`; the first loop starts at zero. The other coordinate is
/// left untouched. The loops themselves are not modified.
pub struct PresentLoops {
    gap: f64,
    axis: Axis,
}

impl PresentLoops {
    /// Creates a new `PresentLoops` operation.
    #[must_use]
    pub fn new(gap: f64, axis: Axis) -> Self {
        Self { gap, axis }
    }

    /// Draws `loops` into `sink`.
    pub fn execute(&self, loops: &[Loop], sink: &mut dyn PresentationSink) {
        let mut cursor = 0.0;
        for (loop_index, lp) in loops.iter().enumerate() {
            let bounds = lp.bounds();
            let (start, extent) = match self.axis {
                Axis::X => (bounds.min.x, bounds.width()),
                Axis::Y => (bounds.min.y, bounds.height()),
            };
            let offset = match self.axis {
                Axis::X => Vector2::new(cursor - start, 0.0),
                Axis::Y => Vector2::new(0.0, cursor - start),
            };
            for (edge_index, edge) in lp.edges().iter().enumerate() {
                let points: Vec<Point2> = edge.points().iter().map(|p| p + offset).collect();
                sink.draw_polyline(loop_index, edge_index, &points);
            }
            cursor += extent + self.gap;
        }
    }
}
