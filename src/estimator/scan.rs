//! # Convergence scan
//!
//! The core of the estimator: walk the candidate sequence from coarse toward
//! fine, compare each run against its immediate predecessor, and report the
//! first time step whose mean trajectory error at the lookahead sample drops
//! below tolerance.
//!
//! ## State machine
//!
//! `INIT → SCANNING → {CONVERGED | EXHAUSTED}`
//!
//! - **INIT** loads candidate 0 as the initial reference; its absence is fatal.
//! - **SCANNING** visits candidates 1..N-1 in increasing order exactly once
//!   each. A missing result aborts the whole scan; a shape mismatch only skips
//!   the candidate, leaving the reference pinned to the last successfully
//!   compared set so the next candidate is measured against it.
//! - Convergence is detected at the **first** candidate whose lookahead error
//!   is strictly below tolerance, but scanning continues to the end so the
//!   full error table is available for diagnostics.
//! - **EXHAUSTED**: tolerance never met; the finest candidate's time step is
//!   reported with `converged = false`.
//!
//! The scan is a plain fold: one explicit reference accumulator, no shared
//! state, producing the error matrix and a final [`ConvergenceResult`].

use nalgebra::DMatrix;
use tracing::{info, warn};

use crate::constants::{Meter, Seconds};
use crate::driftstep_errors::DriftStepError;
use crate::geodesy::haversine_grid;
use crate::results::ResultStore;

/// Outcome of one scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceResult {
    /// The selected time step: the first converged candidate, or the finest
    /// candidate when the tolerance was never met.
    pub best_timestep: Seconds,
    pub converged: bool,
}

/// Full record of one scan: the per-(candidate, sample) mean error table plus
/// the scalar trail the convergence decision was made on.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Candidate time steps, coarsest first, as consumed from the
    /// configuration list.
    pub timesteps: Vec<Seconds>,
    /// Mean-over-particles error in meters, indexed by (candidate, sample).
    /// Row 0 has no predecessor and stays at its zero sentinel, as do rows of
    /// skipped candidates.
    pub error_matrix: DMatrix<f64>,
    /// Error at the lookahead sample per candidate; `None` for row 0 and for
    /// skipped candidates.
    pub lookahead_errors: Vec<Option<Meter>>,
    /// Candidates skipped over a shape mismatch.
    pub skipped: Vec<usize>,
    pub result: ConvergenceResult,
}

/// Resolve a possibly-negative sample offset against the sample count.
fn resolve_lookahead(lookahead: isize, samples: usize) -> Result<usize, DriftStepError> {
    let resolved = if lookahead < 0 {
        samples as isize + lookahead
    } else {
        lookahead
    };
    if resolved < 0 || resolved >= samples as isize {
        return Err(DriftStepError::LookaheadOutOfRange { lookahead, samples });
    }
    Ok(resolved as usize)
}

/// Run the convergence scan over materialized results.
///
/// Arguments
/// ---------
/// * `store`: access to the per-index result sets
/// * `timesteps`: candidate time steps in scan order, coarsest first
/// * `tolerance_m`: convergence tolerance in meters (strict `<` comparison)
/// * `sample_lookahead`: sample offset the scalar error is taken at; negative
///   values count from the end (-1 = last sample)
///
/// Return
/// ------
/// * the [`ScanReport`], or the first fatal error. No partial report is
///   produced when a result file is missing.
pub fn run_scan<S: ResultStore + ?Sized>(
    store: &S,
    timesteps: &[Seconds],
    tolerance_m: Meter,
    sample_lookahead: isize,
) -> Result<ScanReport, DriftStepError> {
    let n = timesteps.len();
    if n < 2 {
        return Err(DriftStepError::InvalidEstimatorParameter(
            "a scan needs at least two candidate time steps".into(),
        ));
    }

    let mut reference = store.load_trajectories(0)?;
    let samples = reference.samples();
    let lookahead_col = resolve_lookahead(sample_lookahead, samples)?;

    let mut error_matrix = DMatrix::zeros(n, samples);
    let mut lookahead_errors: Vec<Option<Meter>> = vec![None; n];
    let mut skipped = Vec::new();
    let mut best: Option<Seconds> = None;

    for i in 1..n {
        let current = store.load_trajectories(i)?;

        if current.shape() != reference.shape() {
            warn!(
                index = i,
                expected = ?reference.shape(),
                actual = ?current.shape(),
                "trajectory shape mismatch, candidate skipped"
            );
            skipped.push(i);
            continue;
        }

        let per_cell = haversine_grid(reference.lat(), reference.lon(), current.lat(), current.lon());
        let particles = current.particles() as f64;
        for j in 0..samples {
            error_matrix[(i, j)] = per_cell.column(j).sum() / particles;
        }

        let error_at = error_matrix[(i, lookahead_col)];
        lookahead_errors[i] = Some(error_at);
        if best.is_none() && error_at < tolerance_m {
            best = Some(timesteps[i]);
            info!(
                time_step = timesteps[i],
                error_m = error_at,
                "convergence tolerance first met"
            );
        }

        reference = current;
    }

    let result = match best {
        Some(time_step) => ConvergenceResult {
            best_timestep: time_step,
            converged: true,
        },
        None => ConvergenceResult {
            best_timestep: timesteps[n - 1],
            converged: false,
        },
    };

    Ok(ScanReport {
        timesteps: timesteps.to_vec(),
        error_matrix,
        lookahead_errors,
        skipped,
        result,
    })
}
