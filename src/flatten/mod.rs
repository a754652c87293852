//! Isometric flattening of curves on developable surfaces.
//!
//! Two phases: [`FlattenEdge`] / [`FlattenFace`] integrate the geodesic
//! field along each curve and produce raw [`Loop`]s, which can be stored as
//! a [`LoopSnapshot`]; [`AssembleLoop`] then chains the raw edges into
//! closed planar outlines.

mod assemble;
mod edge;
mod face;
mod field;
mod loops;
mod present;
mod sampler;
pub mod snapshot;

pub use assemble::{AssembleLoop, AssemblyParams, AssemblyReport};
pub use edge::{FlattenEdge, FlattenedEdge};
pub use face::FlattenFace;
pub use field::GeodesicField;
pub use loops::Loop;
pub use present::{Axis, CollectedPolyline, PolylineCollector, PresentLoops, PresentationSink};
pub use sampler::ArcLengthSampler;
pub use snapshot::LoopSnapshot;

use serde::{Deserialize, Serialize};

use crate::math::ode23::StepControl;
use crate::tessellation::TessellationParams;

/// All tunable parameters of the flattening pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenParams {
    /// Chordal strokes used to place integration nodes.
    pub strokes: TessellationParams,
    /// Local error control of the integrator.
    pub step_control: StepControl,
    /// Loop assembly policy.
    pub assembly: AssemblyParams,
}
