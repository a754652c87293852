use crate::math::Point3;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in the topology store.
    pub struct VertexId;
}

/// A corner of one or more edges.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The 3D position of the vertex.
    pub point: Point3,
}

impl VertexData {
    /// Creates a new vertex at the given point.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self { point }
    }

    /// Whether `point` lies within `tolerance` of this vertex.
    #[must_use]
    pub fn coincides_with(&self, point: &Point3, tolerance: f64) -> bool {
        (self.point - point).norm() <= tolerance
    }
}
