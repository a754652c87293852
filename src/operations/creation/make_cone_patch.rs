use std::f64::consts::TAU;

use crate::error::{OperationError, Result};
use crate::geometry::curve::Arc;
use crate::geometry::surface::Cone;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::topology::{FaceId, FaceSurface, TopologyStore};

use super::{perpendicular_dir, ring_patch};

/// Creates the lateral face of a conical frustum sector.
///
/// The frustum has radius `bottom_radius` at `center` and `top_radius` at
/// `center + height * axis`; both radii must be positive and distinct (the
/// apex is never part of the face). The outer wire is a four-coedge loop
/// running counter-clockwise about the outward normal, starting on the ring
/// nearer the apex.
pub struct MakeConePatch {
    center: Point3,
    bottom_radius: f64,
    top_radius: f64,
    axis: Vector3,
    height: f64,
    sweep: f64,
}

impl MakeConePatch {
    /// Creates a new `MakeConePatch` operation.
    #[must_use]
    pub fn new(
        center: Point3,
        bottom_radius: f64,
        top_radius: f64,
        axis: Vector3,
        height: f64,
        sweep: f64,
    ) -> Self {
        Self {
            center,
            bottom_radius,
            top_radius,
            axis,
            height,
            sweep,
        }
    }

    /// Executes the operation, creating the face in the topology store.
    ///
    /// # Errors
    ///
    /// Returns an error if a radius or the height is not positive, the radii
    /// are equal (use `MakeCylinderPatch`), the axis is degenerate, or the
    /// sweep is outside `(0, 2π]`.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<FaceId> {
        if self.bottom_radius < TOLERANCE || self.top_radius < TOLERANCE {
            return Err(
                OperationError::InvalidInput("cone radii must be positive".into()).into(),
            );
        }
        if (self.bottom_radius - self.top_radius).abs() < TOLERANCE {
            return Err(OperationError::InvalidInput(
                "cone radii must differ; use a cylinder patch".into(),
            )
            .into());
        }
        if self.height < TOLERANCE {
            return Err(
                OperationError::InvalidInput("cone height must be positive".into()).into(),
            );
        }
        if !(self.sweep > TOLERANCE && self.sweep <= TAU + TOLERANCE) {
            return Err(OperationError::InvalidInput(format!(
                "cone sweep {} outside (0, 2pi]",
                self.sweep
            ))
            .into());
        }
        let axis_len = self.axis.norm();
        if axis_len < TOLERANCE {
            return Err(OperationError::InvalidInput("cone axis must be non-zero".into()).into());
        }
        let axis = self.axis / axis_len;
        let sweep = self.sweep.min(TAU);

        // Work in the cone's own frame: axis pointing away from the apex,
        // `near` the ring closer to the apex.
        let top_center = self.center + axis * self.height;
        let (near_center, near_radius, far_center, far_radius, cone_axis) =
            if self.bottom_radius < self.top_radius {
                (self.center, self.bottom_radius, top_center, self.top_radius, axis)
            } else {
                (top_center, self.top_radius, self.center, self.bottom_radius, -axis)
            };
        let tan_alpha = (far_radius - near_radius) / self.height;
        let half_angle = tan_alpha.atan();
        let apex = near_center - cone_axis * (near_radius / tan_alpha);
        let ref_dir = perpendicular_dir(&cone_axis);

        let surface = Cone::new(apex, cone_axis, half_angle, ref_dir)?;
        let near = Arc::new(near_center, near_radius, cone_axis, ref_dir, 0.0, sweep)?;
        let far = Arc::new(far_center, far_radius, cone_axis, ref_dir, 0.0, sweep)?;
        ring_patch(store, FaceSurface::Cone(surface), near, far, sweep)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::Surface;
    use crate::operations::query::Length;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn widening_frustum_apex_below() {
        let mut store = TopologyStore::new();
        let face = MakeConePatch::new(p(0.0, 0.0, 1.0), 1.0, 2.0, Vector3::z(), 1.0, TAU)
            .execute(&mut store)
            .unwrap();
        let FaceSurface::Cone(cone) = &store.face(face).unwrap().surface else {
            panic!("expected a cone surface");
        };
        assert_relative_eq!(*cone.apex(), p(0.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(cone.half_angle(), std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
    }

    #[test]
    fn narrowing_frustum_flips_cone_axis() {
        let mut store = TopologyStore::new();
        let face = MakeConePatch::new(p(0.0, 0.0, 0.0), 2.0, 1.0, Vector3::z(), 1.0, 2.0)
            .execute(&mut store)
            .unwrap();
        let FaceSurface::Cone(cone) = &store.face(face).unwrap().surface else {
            panic!("expected a cone surface");
        };
        assert_relative_eq!(*cone.apex(), p(0.0, 0.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(*cone.axis(), -Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn generators_have_slant_length() {
        let mut store = TopologyStore::new();
        let face = MakeConePatch::new(p(0.0, 0.0, 0.0), 1.0, 4.0, Vector3::z(), 4.0, 1.0)
            .execute(&mut store)
            .unwrap();
        let wire = store.wire(store.face(face).unwrap().outer_wire).unwrap();
        assert!(wire.is_closed);
        let seam = Length::new(wire.edges[1].edge).execute(&store).unwrap();
        assert_relative_eq!(seam, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn outer_wire_is_counter_clockwise_about_normal() {
        let mut store = TopologyStore::new();
        let face = MakeConePatch::new(p(0.0, 0.0, 0.0), 1.0, 2.0, Vector3::z(), 1.0, 1.0)
            .execute(&mut store)
            .unwrap();
        let data = store.face(face).unwrap();
        let wire = store.wire(data.outer_wire).unwrap();
        // First coedge runs along +u; second climbs the generator.
        let first = store.edge(wire.edges[0].edge).unwrap();
        let second = store.edge(wire.edges[1].edge).unwrap();
        let corner = store.vertex(first.end).unwrap().point;
        let along = first.curve.as_curve().tangent(first.t_end).unwrap();
        let up = second.curve.as_curve().tangent(second.t_start).unwrap();
        let n = data.surface.as_surface().normal_at_point(&corner).unwrap();
        assert!(along.cross(&up).dot(&n) > 0.9);
    }

    #[test]
    fn equal_radii_fail() {
        let mut store = TopologyStore::new();
        assert!(MakeConePatch::new(p(0.0, 0.0, 0.0), 1.0, 1.0, Vector3::z(), 1.0, 1.0)
            .execute(&mut store)
            .is_err());
    }
}
