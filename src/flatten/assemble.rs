#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AssemblyError, ClosureMismatch, Result};
use crate::math::polygon_2d::Aabb2;

use super::loops::Loop;

/// Assembly policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyParams {
    /// Closure error above which a [`ClosureMismatch`] is reported.
    pub closure_threshold: f64,
    /// Whether to rotate the loop upright and move it to the origin.
    pub orient_vertical: bool,
}

impl Default for AssemblyParams {
    fn default() -> Self {
        Self {
            closure_threshold: 1e-3,
            orient_vertical: true,
        }
    }
}

/// Outcome of assembling one loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblyReport {
    /// Final closure error.
    pub closure_error: f64,
    /// Final bounding box.
    pub bounds: Aabb2,
    /// Set when the closure error exceeded the threshold.
    pub closure_mismatch: Option<ClosureMismatch>,
}

impl AssemblyReport {
    /// Turns a closure mismatch warning into an error.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::ClosureMismatch`] if the loop did not close
    /// within the threshold.
    pub fn strict(self) -> Result<Self> {
        match self.closure_mismatch {
            Some(mismatch) => Err(AssemblyError::from(mismatch).into()),
            None => Ok(self),
        }
    }
}

/// Chains the raw flattened edges of a loop into one polyline that keeps
/// the measured 3D lengths and corner angles.
///
/// Per loop, in order: length correction in integration order, reversal of
/// flagged edges, rotation of every edge after the first so its corner
/// matches `rel_angles[i]`, translation onto the previous edge's end,
/// closure measurement, optional upright orientation, bounds.
pub struct AssembleLoop {
    params: AssemblyParams,
}

impl AssembleLoop {
    /// Creates a new `AssembleLoop` operation.
    #[must_use]
    pub fn new(params: AssemblyParams) -> Self {
        Self { params }
    }

    /// Assembles `lp` in place.
    pub fn execute(&self, lp: &mut Loop) -> AssemblyReport {
        for edge in lp.edges_mut() {
            edge.correct_length();
            edge.orient_to_loop();
        }

        let rel_angles = lp.rel_angles().to_vec();
        let edges = lp.edges_mut();
        for i in 1..edges.len() {
            let (done, rest) = edges.split_at_mut(i);
            let prev = &done[i - 1];
            let edge = &mut rest[0];
            let actual = edge.start_angle() - prev.end_angle();
            edge.rotate(rel_angles[i] - actual);
            edge.translate_to(&prev.last_point());
        }
        lp.recompute();
        let closure_error = lp.closure_error();

        if self.params.orient_vertical {
            lp.orient_vertical();
        }

        let closure_mismatch = (closure_error > self.params.closure_threshold).then(|| {
            warn!(
                closure_error,
                threshold = self.params.closure_threshold,
                "flattened loop does not close"
            );
            ClosureMismatch {
                error: closure_error,
                threshold: self.params.closure_threshold,
            }
        });
        debug!(edges = lp.edges().len(), closure_error, "assembled loop");

        AssemblyReport {
            closure_error,
            bounds: lp.bounds(),
            closure_mismatch,
        }
    }

    /// Assembles every loop independently.
    #[cfg(feature = "parallel")]
    pub fn execute_all(&self, loops: &mut [Loop]) -> Vec<AssemblyReport> {
        loops.par_iter_mut().map(|lp| self.execute(lp)).collect()
    }

    /// Assembles every loop independently.
    #[cfg(not(feature = "parallel"))]
    pub fn execute_all(&self, loops: &mut [Loop]) -> Vec<AssemblyReport> {
        loops.iter_mut().map(|lp| self.execute(lp)).collect()
    }
}
