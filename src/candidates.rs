//! # Candidate time-step sequence
//!
//! Derives the ordered, exponentially-decreasing sequence of integration time
//! steps the convergence study runs over. Every candidate must divide the
//! output sampling interval exactly: the wrapped simulator requires an integer
//! ratio between the two, so raw candidates are corrected upward to the nearest
//! divisor before being emitted.
//!
//! ## Ordering
//!
//! Candidate 0 is the (corrected) base time step; candidate i for i ≥ 1 starts
//! from `output_interval / 2^i` before correction. The emitted sequence is
//! nominally decreasing, but corrections can collide for small raw values;
//! collisions are logged and tolerated rather than rejected.

use itertools::Itertools;
use tracing::{info, warn};

use crate::constants::{Candidates, Seconds};
use crate::driftstep_errors::DriftStepError;

/// One entry of the candidate sequence: the simulation index it will run under
/// and its integration time step in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestepCandidate {
    pub index: usize,
    pub time_step: Seconds,
}

/// Raise `raw` to the smallest value that divides `output_interval` exactly.
///
/// The search is a deliberate increment-by-one walk: the observable contract is
/// "smallest integer-dividing value ≥ raw", and the tie-break must not change
/// even though a divisor enumeration would be faster.
///
/// Arguments
/// ---------
/// * `raw`: the uncorrected candidate in seconds; a value of 0 corrects upward to 1
/// * `output_interval`: the sampling interval the candidate must divide
///
/// Return
/// ------
/// * the corrected time step, or [`DriftStepError::TimestepExceedsOutputInterval`]
///   when no dividing value ≤ `output_interval` exists at or above `raw`.
pub fn correct_timestep(raw: Seconds, output_interval: Seconds) -> Result<Seconds, DriftStepError> {
    let mut candidate = raw.max(1);
    while candidate <= output_interval && output_interval % candidate != 0 {
        candidate += 1;
    }
    if candidate > output_interval {
        return Err(DriftStepError::TimestepExceedsOutputInterval(output_interval));
    }
    if candidate != raw {
        info!(
            raw,
            corrected = candidate,
            "time step raised to divide the output interval"
        );
    }
    Ok(candidate)
}

/// Build the corrected candidate sequence.
///
/// Arguments
/// ---------
/// * `base_time_step`: candidate 0 before correction
/// * `output_interval`: the output sampling interval, in seconds
/// * `count`: number of candidates to emit
///
/// Return
/// ------
/// * the ordered candidate list, coarsest first. Strict decrease is not
///   guaranteed when corrections collide; each collision is logged at warn level.
pub fn build_candidates(
    base_time_step: Seconds,
    output_interval: Seconds,
    count: usize,
) -> Result<Candidates, DriftStepError> {
    let mut list = Candidates::new();
    list.push(TimestepCandidate {
        index: 0,
        time_step: correct_timestep(base_time_step, output_interval)?,
    });

    for i in 1..count {
        let raw = output_interval.checked_shr(i as u32).unwrap_or(0);
        list.push(TimestepCandidate {
            index: i,
            time_step: correct_timestep(raw, output_interval)?,
        });
    }

    for (coarse, fine) in list.iter().tuple_windows() {
        if fine.time_step >= coarse.time_step {
            warn!(
                coarse = coarse.time_step,
                fine = fine.time_step,
                "correction collision: candidate sequence is not strictly decreasing"
            );
        }
    }

    Ok(list)
}
