use crate::geometry::curve::{Arc, Curve, Helix, Line};

use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the topology store.
    pub struct EdgeId;
}

/// The geometric curve associated with an edge.
#[derive(Debug, Clone)]
pub enum EdgeCurve {
    /// A line segment.
    Line(Line),
    /// A circular arc.
    Arc(Arc),
    /// A helical segment.
    Helix(Helix),
}

impl EdgeCurve {
    /// Borrows the underlying curve as a trait object.
    #[must_use]
    pub fn as_curve(&self) -> &dyn Curve {
        match self {
            Self::Line(line) => line,
            Self::Arc(arc) => arc,
            Self::Helix(helix) => helix,
        }
    }
}

impl From<Line> for EdgeCurve {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Arc> for EdgeCurve {
    fn from(arc: Arc) -> Self {
        Self::Arc(arc)
    }
}

impl From<Helix> for EdgeCurve {
    fn from(helix: Helix) -> Self {
        Self::Helix(helix)
    }
}

/// Data associated with a topological edge.
///
/// An edge connects two vertices and carries a geometric curve
/// trimmed to `[t_start, t_end]`, with `t_start < t_end`.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Start vertex of the edge.
    pub start: VertexId,
    /// End vertex of the edge.
    pub end: VertexId,
    /// The geometric curve defining this edge's shape.
    pub curve: EdgeCurve,
    /// Parameter on the curve corresponding to the start vertex.
    pub t_start: f64,
    /// Parameter on the curve corresponding to the end vertex.
    pub t_end: f64,
}
