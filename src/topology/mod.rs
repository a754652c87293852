pub mod edge;
pub mod face;
pub mod vertex;
pub mod wire;

pub use edge::{EdgeCurve, EdgeData, EdgeId};
pub use face::{FaceData, FaceId, FaceSurface};
pub use vertex::{VertexData, VertexId};
pub use wire::{OrientedEdge, WireData, WireId};

use crate::error::TopologyError;
use slotmap::{Key, SlotMap};

/// Arena owning the boundary entities that feed the flattener.
///
/// Faces reference wires, wires reference edges through coedges and edges
/// reference vertices, all by typed generational IDs. Lookups with an ID
/// from another store or a removed entity fail with
/// [`TopologyError::EntityNotFound`].
#[derive(Debug, Default)]
pub struct TopologyStore {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    wires: SlotMap<WireId, WireData>,
    faces: SlotMap<FaceId, FaceData>,
}

fn lookup<'a, K: Key, V>(
    map: &'a SlotMap<K, V>,
    id: K,
    kind: &str,
) -> Result<&'a V, TopologyError> {
    map.get(id)
        .ok_or_else(|| TopologyError::EntityNotFound(format!("{kind} {id:?}")))
}

impl TopologyStore {
    /// Creates a new, empty topology store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        self.vertices.insert(data)
    }

    pub fn add_edge(&mut self, data: EdgeData) -> EdgeId {
        self.edges.insert(data)
    }

    pub fn add_wire(&mut self, data: WireData) -> WireId {
        self.wires.insert(data)
    }

    pub fn add_face(&mut self, data: FaceData) -> FaceId {
        self.faces.insert(data)
    }

    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for an unknown ID.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        lookup(&self.vertices, id, "vertex")
    }

    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for an unknown ID.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        lookup(&self.edges, id, "edge")
    }

    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for an unknown ID.
    pub fn wire(&self, id: WireId) -> Result<&WireData, TopologyError> {
        lookup(&self.wires, id, "wire")
    }

    /// Mutable access to a wire, e.g. to reopen or reorder its coedges.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for an unknown ID.
    pub fn wire_mut(&mut self, id: WireId) -> Result<&mut WireData, TopologyError> {
        self.wires
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound(format!("wire {id:?}")))
    }

    /// # Errors
    ///
    /// Returns [`TopologyError::EntityNotFound`] for an unknown ID.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        lookup(&self.faces, id, "face")
    }

    /// Returns the (first, last) vertices of a coedge in traversal order.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not found in the store.
    pub fn coedge_vertices(
        &self,
        coedge: OrientedEdge,
    ) -> Result<(VertexId, VertexId), TopologyError> {
        let edge = self.edge(coedge.edge)?;
        Ok(if coedge.forward {
            (edge.start, edge.end)
        } else {
            (edge.end, edge.start)
        })
    }
}
