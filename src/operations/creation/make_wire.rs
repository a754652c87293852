use crate::error::{OperationError, Result};
use crate::geometry::curve::Line;
use crate::math::Point3;
use crate::topology::{OrientedEdge, TopologyStore, VertexData, VertexId, WireData, WireId};

use super::make_edge::{MakeEdge, VERTEX_TOLERANCE};

enum WireSource {
    Polygon { points: Vec<Point3>, close: bool },
    Coedges(Vec<OrientedEdge>),
}

/// Creates a wire, either as a polygon of line edges through 3D points or
/// from existing coedges.
pub struct MakeWire {
    source: WireSource,
}

impl MakeWire {
    /// Creates a `MakeWire` operation building a polygon through `points`.
    ///
    /// With `close`, an extra edge joins the last point back to the first;
    /// the first point must not be repeated at the end.
    #[must_use]
    pub fn new(points: Vec<Point3>, close: bool) -> Self {
        Self {
            source: WireSource::Polygon { points, close },
        }
    }

    /// Creates a `MakeWire` operation chaining existing coedges.
    ///
    /// The wire is closed when the last coedge ends where the first begins.
    #[must_use]
    pub fn from_edges(edges: Vec<OrientedEdge>) -> Self {
        Self {
            source: WireSource::Coedges(edges),
        }
    }

    /// Executes the operation, creating the wire in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if there are too few points or coedges, two
    /// consecutive points coincide, or consecutive coedges do not connect.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<WireId> {
        match &self.source {
            WireSource::Polygon { points, close } => polygon(store, points, *close),
            WireSource::Coedges(edges) => chain(store, edges),
        }
    }
}

fn polygon(store: &mut TopologyStore, points: &[Point3], close: bool) -> Result<WireId> {
    let min_points = if close { 3 } else { 2 };
    if points.len() < min_points {
        return Err(OperationError::InvalidInput(format!(
            "wire needs at least {min_points} points, got {}",
            points.len()
        ))
        .into());
    }

    let vertices: Vec<VertexId> = points
        .iter()
        .map(|p| store.add_vertex(VertexData::new(*p)))
        .collect();

    let n = points.len();
    let segments = if close { n } else { n - 1 };
    let mut edges = Vec::with_capacity(segments);
    for i in 0..segments {
        let j = (i + 1) % n;
        let (line, len) = Line::through(points[i], points[j])?;
        let edge = MakeEdge::new(vertices[i], vertices[j], line.into(), 0.0, len).execute(store)?;
        edges.push(OrientedEdge::new(edge, true));
    }

    Ok(store.add_wire(WireData {
        edges,
        is_closed: close,
    }))
}

fn chain(store: &mut TopologyStore, edges: &[OrientedEdge]) -> Result<WireId> {
    let (Some(first), Some(last)) = (edges.first(), edges.last()) else {
        return Err(OperationError::InvalidInput("wire needs at least one edge".into()).into());
    };

    for (i, pair) in edges.windows(2).enumerate() {
        let (_, end) = store.coedge_vertices(pair[0])?;
        let (start, _) = store.coedge_vertices(pair[1])?;
        if !connected(store, end, start)? {
            return Err(OperationError::InvalidInput(format!(
                "coedge {} does not start where coedge {i} ends",
                i + 1
            ))
            .into());
        }
    }

    let (_, end) = store.coedge_vertices(*last)?;
    let (start, _) = store.coedge_vertices(*first)?;
    let is_closed = connected(store, end, start)?;

    Ok(store.add_wire(WireData {
        edges: edges.to_vec(),
        is_closed,
    }))
}

fn connected(store: &TopologyStore, a: VertexId, b: VertexId) -> Result<bool> {
    if a == b {
        return Ok(true);
    }
    let pb = store.vertex(b)?.point;
    Ok(store.vertex(a)?.coincides_with(&pb, VERTEX_TOLERANCE))
}
