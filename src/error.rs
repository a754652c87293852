use thiserror::Error;

/// Top-level error type for the unfurl flattening kernel.
#[derive(Debug, Error)]
pub enum UnfurlError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    #[error(transparent)]
    Integration(#[from] IntegrationError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Errors raised while evaluating curves and surfaces.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    /// The curve has zero parametric speed, so the geodesic field is undefined.
    #[error("degenerate curve: zero parametric speed at t = {parameter}")]
    DegenerateCurve { parameter: f64 },
}

/// Errors related to topological operations.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("wire is not closed")]
    WireNotClosed,
}

/// Errors related to kernel operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("invalid tessellation parameters: {0}")]
    InvalidParameters(String),
}

/// Errors raised by the ODE23 integrator.
#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error(
        "integration diverged at t = {t}: component {component} error {error:e} exceeds {bound:e}"
    )]
    Divergence {
        t: f64,
        component: usize,
        error: f64,
        bound: f64,
    },

    #[error("invalid integration nodes: {0}")]
    InvalidNodes(String),
}

/// A loop whose assembled end does not meet its start within the threshold.
///
/// Non-fatal by default; see [`crate::flatten::AssemblyReport`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("closure error {error:e} exceeds threshold {threshold:e}")]
pub struct ClosureMismatch {
    /// Distance between the loop's reconstructed end and start.
    pub error: f64,
    /// Threshold that was exceeded.
    pub threshold: f64,
}

/// Errors raised while building or assembling flattened loops.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("loop has no edges")]
    EmptyLoop,

    #[error("loop has {edges} edges but {angles} corner angles")]
    AngleCountMismatch { edges: usize, angles: usize },

    #[error("flattened edge has no points")]
    EmptyEdge,

    #[error("flattened edge has {points} points but {tangents} tangents")]
    TangentCountMismatch { points: usize, tangents: usize },

    #[error(transparent)]
    ClosureMismatch(#[from] ClosureMismatch),
}

/// Errors raised while reading or writing loop snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("snapshot serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results using [`UnfurlError`].
pub type Result<T> = std::result::Result<T, UnfurlError>;
