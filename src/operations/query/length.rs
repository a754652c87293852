use crate::error::Result;
use crate::topology::{EdgeId, TopologyStore};

/// Computes the arc length of an edge between its trim parameters.
pub struct Length {
    edge: EdgeId,
}

impl Length {
    /// Creates a new `Length` query.
    #[must_use]
    pub fn new(edge: EdgeId) -> Self {
        Self { edge }
    }

    /// Executes the query, returning the edge length.
    ///
    /// Lines, arcs and helices are measured analytically; any other curve
    /// falls back to the quadrature in [`Curve::length`](crate::geometry::Curve::length).
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not found or its trim parameters lie
    /// outside the curve domain.
    pub fn execute(&self, store: &TopologyStore) -> Result<f64> {
        let edge = store.edge(self.edge)?;
        edge.curve.as_curve().length(edge.t_start, edge.t_end)
    }
}
