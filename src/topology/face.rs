use crate::geometry::surface::{Cone, Cylinder, Plane, Surface};

use super::wire::WireId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the topology store.
    pub struct FaceId;
}

/// The developable surface carrying a face.
#[derive(Debug, Clone)]
pub enum FaceSurface {
    /// A planar surface.
    Plane(Plane),
    /// A cylindrical surface.
    Cylinder(Cylinder),
    /// A conical surface.
    Cone(Cone),
}

impl FaceSurface {
    /// Borrows the underlying surface as a trait object.
    #[must_use]
    pub fn as_surface(&self) -> &dyn Surface {
        match self {
            Self::Plane(plane) => plane,
            Self::Cylinder(cylinder) => cylinder,
            Self::Cone(cone) => cone,
        }
    }
}

/// Data associated with a topological face.
///
/// A face is a bounded region on a surface, defined by an outer wire
/// and optionally inner wires (holes). Wires run counter-clockwise about
/// the surface normal for the outer boundary.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The geometric surface on which this face lies.
    pub surface: FaceSurface,
    /// The outer boundary wire.
    pub outer_wire: WireId,
    /// Inner boundary wires (holes).
    pub inner_wires: Vec<WireId>,
}

impl FaceData {
    /// Iterates the outer wire followed by the inner wires.
    pub fn wires(&self) -> impl Iterator<Item = WireId> + '_ {
        std::iter::once(self.outer_wire).chain(self.inner_wires.iter().copied())
    }
}
