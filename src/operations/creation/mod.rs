mod make_cone_patch;
mod make_cylinder_patch;
mod make_edge;
mod make_face;
mod make_wire;

pub use make_cone_patch::MakeConePatch;
pub use make_cylinder_patch::MakeCylinderPatch;
pub use make_edge::MakeEdge;
pub use make_face::MakeFace;
pub use make_wire::MakeWire;

use crate::error::Result;
use crate::geometry::curve::{Arc, Curve, Line};
use crate::math::{Vector3, TOLERANCE};
use crate::topology::{FaceId, FaceSurface, OrientedEdge, TopologyStore, VertexData};

/// Finds a direction perpendicular to the given unit vector.
fn perpendicular_dir(axis: &Vector3) -> Vector3 {
    let candidate = if axis.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let perp = axis.cross(&candidate);
    perp / perp.norm()
}

/// Builds a lateral face bounded by two coaxial rings swept over
/// `[0, sweep]` and the two straight generators joining their ends.
///
/// The loop runs `lower ring (+u)`, `generator at sweep (up)`,
/// `upper ring (-u)`, `generator at 0 (down)`. A full turn shares one
/// seam edge between both generators.
fn ring_patch(
    store: &mut TopologyStore,
    surface: FaceSurface,
    lower: Arc,
    upper: Arc,
    sweep: f64,
) -> Result<FaceId> {
    let closed = (sweep - std::f64::consts::TAU).abs() < TOLERANCE;

    let a0 = lower.evaluate(0.0)?;
    let a1 = lower.evaluate(sweep)?;
    let b0 = upper.evaluate(0.0)?;
    let b1 = upper.evaluate(sweep)?;

    let va0 = store.add_vertex(VertexData::new(a0));
    let vb0 = store.add_vertex(VertexData::new(b0));
    let (va1, vb1) = if closed {
        (va0, vb0)
    } else {
        (
            store.add_vertex(VertexData::new(a1)),
            store.add_vertex(VertexData::new(b1)),
        )
    };

    let bottom = MakeEdge::new(va0, va1, lower.into(), 0.0, sweep).execute(store)?;
    let top = MakeEdge::new(vb0, vb1, upper.into(), 0.0, sweep).execute(store)?;
    let (line, len) = Line::through(a0, b0)?;
    let seam_start = MakeEdge::new(va0, vb0, line.into(), 0.0, len).execute(store)?;
    let seam_end = if closed {
        seam_start
    } else {
        let (line, len) = Line::through(a1, b1)?;
        MakeEdge::new(va1, vb1, line.into(), 0.0, len).execute(store)?
    };

    let wire = MakeWire::from_edges(vec![
        OrientedEdge::new(bottom, true),
        OrientedEdge::new(seam_end, true),
        OrientedEdge::new(top, false),
        OrientedEdge::new(seam_start, false),
    ])
    .execute(store)?;
    MakeFace::new(surface, wire, vec![]).execute(store)
}
