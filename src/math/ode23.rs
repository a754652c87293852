//! Embedded Runge-Kutta 2(3) integrator (Bogacki-Shampine, as in MATLAB's `ode23`).
//!
//! Every step evaluates the field three times and reuses the fourth
//! evaluation as the first stage of the next step (First-Same-As-Last).
//! The integrator runs node to node over a caller-supplied parameter
//! sequence; step control only decides whether a node interval is accepted
//! as-is, checked, or split into internal substeps.

use nalgebra::SVector;
use serde::{Deserialize, Serialize};

use crate::error::{IntegrationError, Result};

/// Default absolute tolerance per state component.
pub const DEFAULT_ATOL: f64 = 1e-6;

/// Default relative tolerance.
pub const DEFAULT_RTOL: f64 = 1e-4;

/// Default number of halvings allowed for one node interval.
pub const DEFAULT_MAX_DEPTH: u32 = 8;

/// Error tolerances for the local error check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance<const N: usize> {
    /// Absolute tolerance per component.
    pub atol: SVector<f64, N>,
    /// Relative tolerance.
    pub rtol: f64,
}

impl<const N: usize> Default for Tolerance<N> {
    fn default() -> Self {
        Self::uniform(DEFAULT_ATOL, DEFAULT_RTOL)
    }
}

impl<const N: usize> Tolerance<N> {
    /// Creates a tolerance with the same absolute tolerance for every component.
    #[must_use]
    pub fn uniform(atol: f64, rtol: f64) -> Self {
        Self {
            atol: SVector::repeat(atol),
            rtol,
        }
    }

    /// Per-component threshold `atol_k / rtol` below which magnitudes are
    /// treated as absolute rather than relative.
    #[must_use]
    pub fn threshold(&self) -> SVector<f64, N> {
        self.atol / self.rtol
    }

    /// Returns the first component whose local error violates
    /// `|e_k| <= rtol * max(atol_k / rtol, |x_k|)`, as `(k, |e_k|, bound)`.
    fn first_violation(
        &self,
        error: &SVector<f64, N>,
        x: &SVector<f64, N>,
    ) -> Option<(usize, f64, f64)> {
        let threshold = self.threshold();
        (0..N).find_map(|k| {
            let bound = self.rtol * threshold[k].max(x[k].abs());
            let e = error[k].abs();
            (e > bound).then_some((k, e, bound))
        })
    }
}

/// How node intervals are checked against the local error estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StepControl {
    /// Accept every node interval without checking.
    Fixed,
    /// Check every interval and report the outcome, without corrective action.
    Validated {
        /// Absolute tolerance applied to every component.
        atol: f64,
        /// Relative tolerance.
        rtol: f64,
    },
    /// Halve failing intervals recursively, up to `max_depth` levels.
    Subdivided {
        /// Absolute tolerance applied to every component.
        atol: f64,
        /// Relative tolerance.
        rtol: f64,
        /// Maximum number of halvings per node interval.
        max_depth: u32,
    },
}

impl Default for StepControl {
    fn default() -> Self {
        Self::Subdivided {
            atol: DEFAULT_ATOL,
            rtol: DEFAULT_RTOL,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl StepControl {
    fn tolerance<const N: usize>(self) -> Option<(Tolerance<N>, u32)> {
        match self {
            Self::Fixed => None,
            Self::Validated { atol, rtol } => Some((Tolerance::uniform(atol, rtol), 0)),
            Self::Subdivided {
                atol,
                rtol,
                max_depth,
            } => Some((Tolerance::uniform(atol, rtol), max_depth)),
        }
    }
}

/// First node interval that could not meet the tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
struct StepFailure {
    t: f64,
    component: usize,
    error: f64,
    bound: f64,
}

/// Result of integrating over a node sequence.
#[derive(Debug, Clone)]
pub struct Ode23Solution<const N: usize> {
    /// The node parameters, as supplied.
    pub nodes: Vec<f64>,
    /// State at every node; `states[0]` is the initial state.
    pub states: Vec<SVector<f64, N>>,
    /// Local error estimate of every node interval (one fewer than `nodes`).
    pub errors: Vec<SVector<f64, N>>,
    /// Whether every interval met the tolerance. Always `true` for
    /// [`StepControl::Fixed`], which performs no check.
    pub success: bool,
    /// Number of interval halvings performed.
    pub subdivisions: usize,
    failure: Option<StepFailure>,
}

impl<const N: usize> Ode23Solution<N> {
    /// The state at the last node.
    #[must_use]
    pub fn final_state(&self) -> &SVector<f64, N> {
        // `Ode23::execute` always stores the initial state.
        &self.states[self.states.len() - 1]
    }

    /// Converts a failed tolerance check into an error.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::Divergence`] describing the first interval
    /// whose local error stayed above tolerance.
    pub fn converged(self) -> Result<Self> {
        match self.failure {
            Some(f) => Err(IntegrationError::Divergence {
                t: f.t,
                component: f.component,
                error: f.error,
                bound: f.bound,
            }
            .into()),
            None => Ok(self),
        }
    }
}

/// Integrates `dx/dt = f(t, x)` over a node sequence with the ODE23 scheme.
pub struct Ode23<'a, const N: usize> {
    nodes: &'a [f64],
    x0: SVector<f64, N>,
    control: StepControl,
}

impl<'a, const N: usize> Ode23<'a, N> {
    /// Creates a new fixed-node integration starting from `x0` at `nodes[0]`.
    #[must_use]
    pub fn new(nodes: &'a [f64], x0: SVector<f64, N>) -> Self {
        Self {
            nodes,
            x0,
            control: StepControl::Fixed,
        }
    }

    /// Sets the step control mode.
    #[must_use]
    pub fn with_control(mut self, control: StepControl) -> Self {
        self.control = control;
        self
    }

    /// Executes the integration, returning the state at every node.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::InvalidNodes`] if the node sequence is
    /// empty, non-finite or not strictly increasing, and propagates any
    /// error returned by `f`.
    pub fn execute<F>(&self, mut f: F) -> Result<Ode23Solution<N>>
    where
        F: FnMut(f64, &SVector<f64, N>) -> Result<SVector<f64, N>>,
    {
        validate_nodes(self.nodes)?;
        let tolerance = self.control.tolerance::<N>();

        let mut states = Vec::with_capacity(self.nodes.len());
        let mut errors = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        let mut run = RunStats::default();

        let mut x = self.x0;
        states.push(x);
        let mut s1 = f(self.nodes[0], &x)?;

        for pair in self.nodes.windows(2) {
            let step = match tolerance {
                None => bs23_step(&mut f, pair[0], pair[1], &x, &s1)?,
                Some((tol, max_depth)) => {
                    advance(&mut f, pair[0], pair[1], &x, &s1, &tol, max_depth, 0, &mut run)?
                }
            };
            x = step.x;
            s1 = step.s_end;
            states.push(x);
            errors.push(step.error);
        }

        Ok(Ode23Solution {
            nodes: self.nodes.to_vec(),
            states,
            errors,
            success: run.failure.is_none(),
            subdivisions: run.subdivisions,
            failure: run.failure,
        })
    }
}

/// Estimates an initial step size for adaptive stepping:
/// `h0 = 1 / max_k(|f(t0, x0)_k| / max(atol_k / rtol, |x0_k|))`.
///
/// Returns `f64::INFINITY` when the field vanishes at `(t0, x0)`.
///
/// # Errors
///
/// Propagates any error returned by `f`.
pub fn initial_step<F, const N: usize>(
    mut f: F,
    t0: f64,
    x0: &SVector<f64, N>,
    tolerance: &Tolerance<N>,
) -> Result<f64>
where
    F: FnMut(f64, &SVector<f64, N>) -> Result<SVector<f64, N>>,
{
    let f0 = f(t0, x0)?;
    let threshold = tolerance.threshold();
    let rate = (0..N)
        .map(|k| f0[k].abs() / threshold[k].max(x0[k].abs()))
        .fold(0.0_f64, f64::max);
    if rate > 0.0 {
        Ok(1.0 / rate)
    } else {
        Ok(f64::INFINITY)
    }
}

#[derive(Debug, Default)]
struct RunStats {
    subdivisions: usize,
    failure: Option<StepFailure>,
}

struct Step<const N: usize> {
    x: SVector<f64, N>,
    s_end: SVector<f64, N>,
    error: SVector<f64, N>,
}

fn validate_nodes(nodes: &[f64]) -> Result<()> {
    if nodes.is_empty() {
        return Err(IntegrationError::InvalidNodes("node sequence is empty".into()).into());
    }
    if let Some(t) = nodes.iter().find(|t| !t.is_finite()) {
        return Err(IntegrationError::InvalidNodes(format!("non-finite node {t}")).into());
    }
    if let Some(pair) = nodes.windows(2).find(|pair| pair[1] <= pair[0]) {
        return Err(IntegrationError::InvalidNodes(format!(
            "nodes must be strictly increasing, found {} after {}",
            pair[1], pair[0]
        ))
        .into());
    }
    Ok(())
}

/// One Bogacki-Shampine step from `t` to `t_next`, given `s1 = f(t, x)`.
fn bs23_step<F, const N: usize>(
    f: &mut F,
    t: f64,
    t_next: f64,
    x: &SVector<f64, N>,
    s1: &SVector<f64, N>,
) -> Result<Step<N>>
where
    F: FnMut(f64, &SVector<f64, N>) -> Result<SVector<f64, N>>,
{
    let h = t_next - t;
    let s2 = f(t + h / 2.0, &(x + s1 * (h / 2.0)))?;
    let s3 = f(t + 3.0 * h / 4.0, &(x + s2 * (3.0 * h / 4.0)))?;
    let x_next = x + (s1 * 2.0 + s2 * 3.0 + s3 * 4.0) * (h / 9.0);
    let s4 = f(t_next, &x_next)?;
    let error = (s1 * -5.0 + s2 * 6.0 + s3 * 8.0 - s4 * 9.0) * (h / 72.0);
    Ok(Step {
        x: x_next,
        s_end: s4,
        error,
    })
}

/// Steps from `t` to `t_next`, halving the interval while the local error
/// check fails and `depth < max_depth`.
#[allow(clippy::too_many_arguments)]
fn advance<F, const N: usize>(
    f: &mut F,
    t: f64,
    t_next: f64,
    x: &SVector<f64, N>,
    s1: &SVector<f64, N>,
    tolerance: &Tolerance<N>,
    max_depth: u32,
    depth: u32,
    run: &mut RunStats,
) -> Result<Step<N>>
where
    F: FnMut(f64, &SVector<f64, N>) -> Result<SVector<f64, N>>,
{
    let step = bs23_step(f, t, t_next, x, s1)?;
    let Some((component, error, bound)) = tolerance.first_violation(&step.error, &step.x) else {
        return Ok(step);
    };

    if depth >= max_depth {
        run.failure.get_or_insert(StepFailure {
            t: t_next,
            component,
            error,
            bound,
        });
        return Ok(step);
    }

    run.subdivisions += 1;
    let mid = t + 0.5 * (t_next - t);
    let left = advance(f, t, mid, x, s1, tolerance, max_depth, depth + 1, run)?;
    let right = advance(
        f,
        mid,
        t_next,
        &left.x,
        &left.s_end,
        tolerance,
        max_depth,
        depth + 1,
        run,
    )?;
    Ok(Step {
        x: right.x,
        s_end: right.s_end,
        error: left.error + right.error,
    })
}
