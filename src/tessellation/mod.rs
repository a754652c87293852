mod tessellate_curve;

pub use tessellate_curve::TessellateCurve;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TessellationError};
use crate::math::Point3;

/// Parameters controlling tessellation quality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationParams {
    /// Maximum allowed deviation from the true geometry.
    pub tolerance: f64,
    /// Minimum number of segments for curves.
    pub min_segments: usize,
    /// Maximum number of segments for curves.
    pub max_segments: usize,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            min_segments: 4,
            max_segments: 256,
        }
    }
}

impl TessellationParams {
    /// Creates parameters with the given chordal tolerance and default segment limits.
    #[must_use]
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    /// Checks that the parameters describe a usable tessellation.
    ///
    /// # Errors
    ///
    /// Returns [`TessellationError::InvalidParameters`] if the tolerance is not
    /// positive or the segment limits are inconsistent.
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance > 0.0) {
            return Err(TessellationError::InvalidParameters(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            ))
            .into());
        }
        if self.min_segments == 0 || self.max_segments < self.min_segments {
            return Err(TessellationError::InvalidParameters(format!(
                "segment limits must satisfy 1 <= min ({}) <= max ({})",
                self.min_segments, self.max_segments
            ))
            .into());
        }
        Ok(())
    }
}

/// A polyline approximation of a curve.
#[derive(Debug, Clone, Default)]
pub struct Polyline {
    /// The ordered vertices of the polyline.
    pub points: Vec<Point3>,
}

impl Polyline {
    /// Sum of the segment lengths.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }
}
