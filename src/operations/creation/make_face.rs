use crate::error::{Result, TopologyError};
use crate::topology::{FaceData, FaceId, FaceSurface, TopologyStore, WireId};

/// Creates a face from closed boundary wires on a surface.
pub struct MakeFace {
    surface: FaceSurface,
    outer_wire: WireId,
    inner_wires: Vec<WireId>,
}

impl MakeFace {
    /// Creates a new `MakeFace` operation.
    #[must_use]
    pub fn new(surface: FaceSurface, outer_wire: WireId, inner_wires: Vec<WireId>) -> Self {
        Self {
            surface,
            outer_wire,
            inner_wires,
        }
    }

    /// Executes the operation, creating the face in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if a wire is missing or open.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<FaceId> {
        for &wire in std::iter::once(&self.outer_wire).chain(&self.inner_wires) {
            if !store.wire(wire)?.is_closed {
                return Err(TopologyError::WireNotClosed.into());
            }
        }
        Ok(store.add_face(FaceData {
            surface: self.surface.clone(),
            outer_wire: self.outer_wire,
            inner_wires: self.inner_wires.clone(),
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::UnfurlError;
    use crate::geometry::surface::Plane;
    use crate::math::{Point3, Vector3};
    use crate::operations::creation::MakeWire;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn xy_plane() -> FaceSurface {
        FaceSurface::Plane(Plane::from_normal(Point3::origin(), Vector3::z()).unwrap())
    }

    #[test]
    fn square_with_hole() {
        let mut store = TopologyStore::new();
        let outer = MakeWire::new(
            vec![p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(4.0, 4.0, 0.0), p(0.0, 4.0, 0.0)],
            true,
        )
        .execute(&mut store)
        .unwrap();
        let hole = MakeWire::new(
            vec![p(1.0, 1.0, 0.0), p(1.0, 2.0, 0.0), p(2.0, 2.0, 0.0), p(2.0, 1.0, 0.0)],
            true,
        )
        .execute(&mut store)
        .unwrap();
        let face = MakeFace::new(xy_plane(), outer, vec![hole])
            .execute(&mut store)
            .unwrap();
        let wires: Vec<_> = store.face(face).unwrap().wires().collect();
        assert_eq!(wires, vec![outer, hole]);
    }

    #[test]
    fn open_wire_is_rejected() {
        let mut store = TopologyStore::new();
        let open = MakeWire::new(vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)], false)
            .execute(&mut store)
            .unwrap();
        let err = MakeFace::new(xy_plane(), open, vec![])
            .execute(&mut store)
            .unwrap_err();
        assert!(matches!(
            err,
            UnfurlError::Topology(TopologyError::WireNotClosed)
        ));
    }
}
