use crate::error::{OperationError, Result};
use crate::topology::{EdgeCurve, EdgeData, EdgeId, TopologyStore, VertexId};

/// Maximum distance between a vertex and the curve end it sits on.
pub(crate) const VERTEX_TOLERANCE: f64 = 1e-7;

/// Creates an edge trimming a curve between two existing vertices.
pub struct MakeEdge {
    start: VertexId,
    end: VertexId,
    curve: EdgeCurve,
    t_start: f64,
    t_end: f64,
}

impl MakeEdge {
    /// Creates a new `MakeEdge` operation.
    #[must_use]
    pub fn new(start: VertexId, end: VertexId, curve: EdgeCurve, t_start: f64, t_end: f64) -> Self {
        Self {
            start,
            end,
            curve,
            t_start,
            t_end,
        }
    }

    /// Executes the operation, creating the edge in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if a vertex is missing, the trim range is empty, or
    /// the curve does not pass through the vertices at its trim parameters.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<EdgeId> {
        if !(self.t_start < self.t_end) {
            return Err(OperationError::InvalidInput(format!(
                "edge range [{}, {}] is empty",
                self.t_start, self.t_end
            ))
            .into());
        }

        let curve = self.curve.as_curve();
        for (vertex, t) in [(self.start, self.t_start), (self.end, self.t_end)] {
            let on_curve = curve.evaluate(t)?;
            if !store.vertex(vertex)?.coincides_with(&on_curve, VERTEX_TOLERANCE) {
                return Err(OperationError::InvalidInput(format!(
                    "curve at t = {t} does not meet its vertex"
                ))
                .into());
            }
        }

        Ok(store.add_edge(EdgeData {
            start: self.start,
            end: self.end,
            curve: self.curve.clone(),
            t_start: self.t_start,
            t_end: self.t_end,
        }))
    }
}
