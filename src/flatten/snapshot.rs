//! Versioned JSON form of raw (unassembled) loops.
//!
//! Flattening integrates along every curve and is the expensive phase;
//! assembly only needs the per-edge points, tangents, lengths and corner
//! angles. A snapshot stores exactly that, so assembly can be re-run with
//! different parameters without touching the geometry again.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapshotError};
use crate::math::{Point2, Vector2};

use super::edge::FlattenedEdge;
use super::loops::Loop;

/// Schema version written by [`LoopSnapshot::capture`].
pub const SNAPSHOT_VERSION: u32 = 1;

/// One flattened edge and the corner that precedes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// True arc length of the source curve.
    pub length3d: f64,
    /// Measured turning angle into this edge.
    pub rel_angle: f64,
    /// Whether the points still run against the loop direction.
    pub needs_reverse: bool,
    /// Planar points as `[x, y]`.
    pub points: Vec<[f64; 2]>,
    /// Planar tangents as `[vx, vy]`.
    pub tangents: Vec<[f64; 2]>,
}

/// The edges of one loop, in loop order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopRecord {
    /// Edge records.
    pub edges: Vec<EdgeRecord>,
}

/// A set of raw loops, typically all wires of one or more faces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopSnapshot {
    /// Schema version; only [`SNAPSHOT_VERSION`] is understood.
    pub version: u32,
    /// Loop records.
    pub loops: Vec<LoopRecord>,
}

impl LoopSnapshot {
    /// Records the current state of `loops`.
    #[must_use]
    pub fn capture(loops: &[Loop]) -> Self {
        let loops = loops
            .iter()
            .map(|lp| LoopRecord {
                edges: lp
                    .edges()
                    .iter()
                    .zip(lp.rel_angles())
                    .map(|(edge, &rel_angle)| EdgeRecord {
                        length3d: edge.length3d(),
                        rel_angle,
                        needs_reverse: edge.needs_reverse(),
                        points: edge.points().iter().map(|p| [p.x, p.y]).collect(),
                        tangents: edge.tangents().iter().map(|t| [t.x, t.y]).collect(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            version: SNAPSHOT_VERSION,
            loops,
        }
    }

    /// Rebuilds the recorded loops.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::UnsupportedVersion`] for a foreign schema
    /// version, and the loop or edge validation errors for malformed records.
    pub fn restore(&self) -> Result<Vec<Loop>> {
        self.check_version()?;
        self.loops
            .iter()
            .map(|record| {
                let edges = record
                    .edges
                    .iter()
                    .map(|e| {
                        FlattenedEdge::new(
                            e.points.iter().map(|&[x, y]| Point2::new(x, y)).collect(),
                            e.tangents.iter().map(|&[x, y]| Vector2::new(x, y)).collect(),
                            e.length3d,
                            e.needs_reverse,
                        )
                    })
                    .collect::<Result<Vec<_>>>()?;
                let rel_angles = record.edges.iter().map(|e| e.rel_angle).collect();
                Loop::new(edges, rel_angles)
            })
            .collect()
    }

    /// Writes the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] or [`SnapshotError::Io`] if writing fails.
    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self).map_err(SnapshotError::from)?;
        writer.flush().map_err(SnapshotError::from)?;
        Ok(())
    }

    /// Reads a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] for malformed input and
    /// [`SnapshotError::UnsupportedVersion`] for a foreign schema version.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let snapshot: Self = serde_json::from_reader(reader).map_err(SnapshotError::from)?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    fn check_version(&self) -> Result<()> {
        if self.version == SNAPSHOT_VERSION {
            Ok(())
        } else {
            Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            }
            .into())
        }
    }
}
