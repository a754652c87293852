//! Isometric flattening of developable CAD faces.
//!
//! Curves lying on planes, cylinders and cones are unrolled into the plane
//! by integrating their geodesic curvature, then the edges of each face
//! boundary are chained into closed outlines that keep the measured 3D
//! edge lengths and corner angles.

pub mod error;
pub mod flatten;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod tessellation;
pub mod topology;

pub use error::{Result, UnfurlError};
