mod common;

use std::cell::RefCell;

use approx::assert_relative_eq;
use common::{chained_store, flat_set, offset_north};
use driftstep::estimator::scan::run_scan;
use driftstep::results::memory::InMemoryStore;
use driftstep::{DriftStepError, ForcingPeaks, ResultStore, TrajectorySet};

const TIMESTEPS: [u32; 5] = [86_400, 43_200, 21_600, 10_800, 5_400];

#[test]
fn first_sub_tolerance_candidate_wins() {
    let store = chained_store(&[500.0, 220.0, 80.0, 30.0]);
    let report = run_scan(&store, &TIMESTEPS, 100.0, -1).unwrap();

    assert!(report.result.converged);
    assert_eq!(report.result.best_timestep, 10_800);

    assert_relative_eq!(report.lookahead_errors[1].unwrap(), 500.0, max_relative = 1e-9);
    assert_relative_eq!(report.lookahead_errors[3].unwrap(), 80.0, max_relative = 1e-9);
    assert!(report.lookahead_errors[0].is_none());
    assert!(report.error_matrix.row(0).iter().all(|&e| e == 0.0));
}

#[test]
fn scanning_continues_past_the_first_convergence() {
    let store = chained_store(&[500.0, 220.0, 80.0, 30.0]);
    let report = run_scan(&store, &TIMESTEPS, 100.0, -1).unwrap();

    // The finer candidate after the winner is still measured for the table.
    assert_relative_eq!(report.lookahead_errors[4].unwrap(), 30.0, max_relative = 1e-9);
    assert!(report.error_matrix.row(4).iter().all(|&e| e > 0.0));
}

#[test]
fn exhaustion_reports_the_finest_candidate() {
    let store = chained_store(&[900.0, 700.0, 650.0]);
    let report = run_scan(&store, &TIMESTEPS[..4], 100.0, -1).unwrap();

    assert!(!report.result.converged);
    assert_eq!(report.result.best_timestep, 10_800);
    assert!(report.skipped.is_empty());
}

#[test]
fn shape_mismatch_skips_the_candidate_but_keeps_the_reference() {
    let set0 = flat_set(0, 5, 12, -25.0, -39.0);
    let set1 = offset_north(&set0, 1, 500.0);
    // One extra particle: wrong shape, must be skipped.
    let stray = flat_set(2, 6, 12, -25.0, -39.0);
    let set3 = offset_north(&set1, 3, 42.0);

    let mut store = InMemoryStore::new();
    store.push(set0);
    store.push(set1);
    store.push(stray);
    store.push(set3);

    let report = run_scan(&store, &TIMESTEPS[..4], 100.0, -1).unwrap();

    assert_eq!(report.skipped, vec![2]);
    assert!(report.lookahead_errors[2].is_none());
    assert!(report.error_matrix.row(2).iter().all(|&e| e == 0.0));

    // Candidate 3 is measured against candidate 1, the last good reference.
    assert_relative_eq!(report.lookahead_errors[3].unwrap(), 42.0, max_relative = 1e-9);
    assert!(report.result.converged);
    assert_eq!(report.result.best_timestep, TIMESTEPS[3]);
}

#[test]
fn missing_result_aborts_the_scan_naming_the_index() {
    let set0 = flat_set(0, 5, 12, -25.0, -39.0);
    let set1 = offset_north(&set0, 1, 500.0);
    let set3 = flat_set(3, 5, 12, -25.0, -39.0);

    let mut store = InMemoryStore::new();
    store.push(set0);
    store.push(set1);
    store.push_missing();
    store.push(set3);

    let err = run_scan(&store, &TIMESTEPS[..4], 100.0, -1).unwrap_err();
    assert!(matches!(
        err,
        DriftStepError::MissingResultFile { index: 2, .. }
    ));
}

/// Store wrapper recording every trajectory load.
struct RecordingStore {
    inner: InMemoryStore,
    loads: RefCell<Vec<usize>>,
}

impl ResultStore for RecordingStore {
    fn load_trajectories(&self, index: usize) -> Result<TrajectorySet, DriftStepError> {
        self.loads.borrow_mut().push(index);
        self.inner.load_trajectories(index)
    }

    fn load_forcing_peaks(&self, index: usize) -> Result<ForcingPeaks, DriftStepError> {
        self.inner.load_forcing_peaks(index)
    }
}

#[test]
fn candidates_are_visited_in_increasing_order_exactly_once() {
    let store = RecordingStore {
        inner: chained_store(&[500.0, 220.0, 80.0, 30.0]),
        loads: RefCell::new(Vec::new()),
    };

    run_scan(&store, &TIMESTEPS, 100.0, -1).unwrap();
    assert_eq!(*store.loads.borrow(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn lookahead_out_of_range_is_fatal() {
    let store = chained_store(&[500.0, 220.0]);
    for lookahead in [12, -13] {
        let err = run_scan(&store, &TIMESTEPS[..3], 100.0, lookahead).unwrap_err();
        assert!(matches!(
            err,
            DriftStepError::LookaheadOutOfRange { samples: 12, .. }
        ));
    }
}

#[test]
fn positive_lookahead_selects_that_sample() {
    // Uniform offsets give the same error at every sample, so any in-range
    // lookahead must agree with -1.
    let store = chained_store(&[500.0, 220.0, 80.0, 30.0]);
    let from_start = run_scan(&store, &TIMESTEPS, 100.0, 0).unwrap();
    let from_end = run_scan(&store, &TIMESTEPS, 100.0, -1).unwrap();
    assert_eq!(
        from_start.result.best_timestep,
        from_end.result.best_timestep
    );
    assert_relative_eq!(
        from_start.lookahead_errors[2].unwrap(),
        from_end.lookahead_errors[2].unwrap(),
        max_relative = 1e-9
    );
}

#[test]
fn a_scan_needs_at_least_two_candidates() {
    let store = chained_store(&[500.0]);
    assert!(matches!(
        run_scan(&store, &TIMESTEPS[..1], 100.0, -1),
        Err(DriftStepError::InvalidEstimatorParameter(_))
    ));
}
