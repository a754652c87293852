pub mod curve;
pub mod surface;

pub use curve::{Arc, Curve, CurveDomain, Helix, Line};
pub use surface::{Cone, Cylinder, Plane, Surface, SurfaceDomain};
