use std::f64::consts::TAU;

use crate::error::{OperationError, Result};
use crate::geometry::curve::Arc;
use crate::geometry::surface::Cylinder;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::topology::{FaceId, FaceSurface, TopologyStore};

use super::{perpendicular_dir, ring_patch};

/// Creates the lateral face of a cylinder sector.
///
/// The face spans `sweep` radians around the axis, starting at an arbitrary
/// reference direction, and `height` along the axis from `center`. Its outer
/// wire is a four-coedge loop running counter-clockwise about the outward
/// normal; a full turn (`sweep = 2π`) closes through a shared seam edge.
pub struct MakeCylinderPatch {
    center: Point3,
    radius: f64,
    axis: Vector3,
    height: f64,
    sweep: f64,
}

impl MakeCylinderPatch {
    /// Creates a new `MakeCylinderPatch` operation.
    #[must_use]
    pub fn new(center: Point3, radius: f64, axis: Vector3, height: f64, sweep: f64) -> Self {
        Self {
            center,
            radius,
            axis,
            height,
            sweep,
        }
    }

    /// Executes the operation, creating the face in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius or height is not positive, the axis is
    /// degenerate, or the sweep is outside `(0, 2π]`.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<FaceId> {
        if self.radius < TOLERANCE {
            return Err(
                OperationError::InvalidInput("cylinder radius must be positive".into()).into(),
            );
        }
        if self.height < TOLERANCE {
            return Err(
                OperationError::InvalidInput("cylinder height must be positive".into()).into(),
            );
        }
        if !(self.sweep > TOLERANCE && self.sweep <= TAU + TOLERANCE) {
            return Err(OperationError::InvalidInput(format!(
                "cylinder sweep {} outside (0, 2pi]",
                self.sweep
            ))
            .into());
        }
        let axis_len = self.axis.norm();
        if axis_len < TOLERANCE {
            return Err(
                OperationError::InvalidInput("cylinder axis must be non-zero".into()).into(),
            );
        }
        let axis = self.axis / axis_len;
        let ref_dir = perpendicular_dir(&axis);
        let sweep = self.sweep.min(TAU);

        let surface = Cylinder::new(self.center, self.radius, axis, ref_dir)?;
        let lower = Arc::new(self.center, self.radius, axis, ref_dir, 0.0, sweep)?;
        let upper = Arc::new(
            self.center + axis * self.height,
            self.radius,
            axis,
            ref_dir,
            0.0,
            sweep,
        )?;
        ring_patch(store, FaceSurface::Cylinder(surface), lower, upper, sweep)
    }
}
