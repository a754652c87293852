#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::error::{Result, TopologyError};
use crate::math::{signed_angle, Point3, Vector3};
use crate::topology::{FaceId, FaceSurface, TopologyStore, WireId};

use super::edge::FlattenEdge;
use super::loops::Loop;
use super::FlattenParams;

/// Loop-direction derivatives at both ends of a coedge.
struct Corner {
    point: Point3,
    incoming: Vector3,
    outgoing: Vector3,
}

/// Flattens every boundary wire of a face into a raw [`Loop`].
///
/// Wires come out outer first, then inner. Each coedge is flattened on the
/// face surface with `needs_reverse` set when it runs against its curve.
/// Corner angles are measured in 3D: the signed angle, about the surface
/// normal at the corner, from the end derivative of one coedge to the start
/// derivative of the next, both taken in loop direction.
pub struct FlattenFace {
    face: FaceId,
    params: FlattenParams,
}

impl FlattenFace {
    /// Creates a new `FlattenFace` operation.
    #[must_use]
    pub fn new(face: FaceId, params: FlattenParams) -> Self {
        Self { face, params }
    }

    /// Executes the operation, returning one unassembled loop per wire.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::WireNotClosed`] for an open wire, and
    /// propagates lookup, flattening and evaluator failures.
    #[instrument(level = "debug", skip_all)]
    pub fn execute(&self, store: &TopologyStore) -> Result<Vec<Loop>> {
        let face = store.face(self.face)?;
        let wires: Vec<WireId> = face.wires().collect();
        let loops = self.flatten_wires(store, &face.surface, wires)?;
        debug!(loops = loops.len(), "flattened face");
        Ok(loops)
    }

    #[cfg(feature = "parallel")]
    fn flatten_wires(
        &self,
        store: &TopologyStore,
        surface: &FaceSurface,
        wires: Vec<WireId>,
    ) -> Result<Vec<Loop>> {
        wires
            .into_par_iter()
            .map(|wire| flatten_wire(store, surface, wire, &self.params))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn flatten_wires(
        &self,
        store: &TopologyStore,
        surface: &FaceSurface,
        wires: Vec<WireId>,
    ) -> Result<Vec<Loop>> {
        wires
            .into_iter()
            .map(|wire| flatten_wire(store, surface, wire, &self.params))
            .collect()
    }
}

fn flatten_wire(
    store: &TopologyStore,
    surface: &FaceSurface,
    wire: WireId,
    params: &FlattenParams,
) -> Result<Loop> {
    let wire = store.wire(wire)?;
    if !wire.is_closed {
        return Err(TopologyError::WireNotClosed.into());
    }
    let surface = surface.as_surface();

    let mut edges = Vec::with_capacity(wire.edges.len());
    let mut corners = Vec::with_capacity(wire.edges.len());
    for coedge in &wire.edges {
        let data = store.edge(coedge.edge)?;
        let curve = data.curve.as_curve();
        edges.push(
            FlattenEdge::new(curve, surface, data.t_start, data.t_end)
                .with_forward(coedge.forward)
                .with_params(params)
                .execute()?,
        );

        let d_start = curve.derivative(data.t_start)?;
        let d_end = curve.derivative(data.t_end)?;
        let (incoming, outgoing) = if coedge.forward {
            (d_start, d_end)
        } else {
            (-d_end, -d_start)
        };
        let (first, _) = store.coedge_vertices(*coedge)?;
        corners.push(Corner {
            point: store.vertex(first)?.point,
            incoming,
            outgoing,
        });
    }

    let n = corners.len();
    let rel_angles = (0..n)
        .map(|i| {
            let prev = &corners[(i + n - 1) % n];
            let corner = &corners[i];
            let normal = surface.normal_at_point(&corner.point)?;
            Ok(signed_angle(&prev.outgoing, &corner.incoming, &normal))
        })
        .collect::<Result<Vec<_>>>()?;

    Loop::new(edges, rel_angles)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::UnfurlError;
    use crate::flatten::{AssembleLoop, AssemblyParams};
    use crate::geometry::surface::Plane;
    use crate::operations::creation::{MakeFace, MakeWire};
    use std::f64::consts::FRAC_PI_2;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn plate_with_hole(store: &mut TopologyStore) -> FaceId {
        let outer = MakeWire::new(
            vec![p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(2.0, 1.0, 0.0), p(0.0, 1.0, 0.0)],
            true,
        )
        .execute(store)
        .unwrap();
        // Holes run clockwise about the normal.
        let hole = MakeWire::new(
            vec![p(0.5, 0.25, 0.0), p(0.5, 0.5, 0.0), p(1.0, 0.5, 0.0), p(1.0, 0.25, 0.0)],
            true,
        )
        .execute(store)
        .unwrap();
        let plane = Plane::from_normal(Point3::origin(), Vector3::z()).unwrap();
        MakeFace::new(FaceSurface::Plane(plane), outer, vec![hole])
            .execute(store)
            .unwrap()
    }

    #[test]
    fn wires_become_loops_with_signed_corners() {
        let mut store = TopologyStore::new();
        let face = plate_with_hole(&mut store);
        let loops = FlattenFace::new(face, FlattenParams::default())
            .execute(&store)
            .unwrap();
        assert_eq!(loops.len(), 2);
        for a in loops[0].rel_angles() {
            assert!((a - FRAC_PI_2).abs() < 1e-12);
        }
        for a in loops[1].rel_angles() {
            assert!((a + FRAC_PI_2).abs() < 1e-12);
        }
    }

    #[test]
    fn assembled_plate_keeps_its_size() {
        let mut store = TopologyStore::new();
        let face = plate_with_hole(&mut store);
        let mut loops = FlattenFace::new(face, FlattenParams::default())
            .execute(&store)
            .unwrap();
        let reports = AssembleLoop::new(AssemblyParams::default()).execute_all(&mut loops);
        assert!(reports[0].closure_error < 1e-9);
        assert!((reports[0].bounds.width() - 1.0).abs() < 1e-9);
        assert!((reports[0].bounds.height() - 2.0).abs() < 1e-9);
        assert!(reports[1].closure_error < 1e-9);
        assert!((reports[1].bounds.width() - 0.25).abs() < 1e-9);
        assert!((reports[1].bounds.height() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn open_wire_is_rejected() {
        let mut store = TopologyStore::new();
        let face = plate_with_hole(&mut store);
        let outer = store.face(face).unwrap().outer_wire;
        store.wire_mut(outer).unwrap().is_closed = false;
        let err = FlattenFace::new(face, FlattenParams::default())
            .execute(&store)
            .unwrap_err();
        assert!(matches!(
            err,
            UnfurlError::Topology(TopologyError::WireNotClosed)
        ));
    }
}
