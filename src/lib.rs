//! # driftstep: time-step convergence estimation for particle-drift simulations
//!
//! An external drift simulator integrates particle trajectories with a fixed
//! internal time step and records positions at a coarser output interval.
//! Picking that internal step is a trade-off: too coarse and the trajectories
//! are wrong, too fine and the runs take forever. This crate answers the
//! question empirically: given one result set per candidate time step, it
//! finds the **coarsest step whose trajectories agree with the
//! next-finer run to within a user tolerance**.
//!
//! ## Pipeline
//!
//! 1. [`candidates`] derives the exponentially-decreasing candidate sequence,
//!    corrected so every step divides the output interval exactly.
//! 2. [`config`] fans a reference [`SimulationConfig`](config::SimulationConfig)
//!    out into one record per candidate and persists the family as a YAML list.
//! 3. [`runner`] is the one-operation contract with the external simulator:
//!    run one record, materialize one result file.
//! 4. [`estimator`] scans the materialized results coarse → fine, compares
//!    each run against its immediate predecessor with the [`geodesy`]
//!    haversine distance, and reports the first sub-tolerance step, plus a
//!    Courant-number diagnostic of the selected step.
//! 5. [`report`] renders the error table for humans.
//!
//! Result files are consumed through the [`results::ResultStore`] trait; the
//! NetCDF-backed store is behind the `netcdf` feature, and an in-memory store
//! serves tests and embeddings.

pub mod candidates;
pub mod config;
pub mod constants;
pub mod driftstep_errors;
pub mod estimator;
pub mod geodesy;
pub mod report;
pub mod results;
pub mod runner;

pub use candidates::{build_candidates, correct_timestep, TimestepCandidate};
pub use config::SimulationConfig;
pub use constants::Candidates;
pub use driftstep_errors::DriftStepError;
pub use estimator::courant::CourantDiagnostic;
pub use estimator::scan::{ConvergenceResult, ScanReport};
pub use estimator::{EstimatorParams, TimestepEstimator};
pub use results::{ForcingPeaks, ResultStore, TrajectorySet};
pub use runner::{IntegrationScheme, SimulationRunner};
