//! # Result-set access
//!
//! The drift simulator materializes one result file per simulation index.
//! This module defines the estimator-facing view of those files:
//!
//! - [`TrajectorySet`] – the per-run (particle × sample) position grids,
//!   immutable once read,
//! - [`ForcingPeaks`] – the peak current/wind components used by the Courant
//!   diagnostic,
//! - [`ResultStore`] – the trait the estimator consumes results through.
//!
//! Two stores implement the trait: [`memory::InMemoryStore`] for in-memory
//! batches, and `netcdf_store::NetcdfStore` (feature `netcdf`) for the files
//! the simulator actually writes. Each read is scoped: the backing handle is
//! opened, the required fields are copied out, and the handle is released
//! before the data is handed to the caller.

pub mod memory;
#[cfg(feature = "netcdf")]
pub mod netcdf_store;

use nalgebra::DMatrix;

use crate::constants::{Degree, MeterPerSecond};
use crate::driftstep_errors::DriftStepError;

/// Name of the result file written for simulation `index`.
pub fn result_file_name(index: usize) -> String {
    format!("result_{index:04}.nc")
}

/// Recorded positions of one simulation run: latitude and longitude grids
/// indexed by (particle, sample), in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySet {
    lat: DMatrix<f64>,
    lon: DMatrix<f64>,
}

impl TrajectorySet {
    /// Assemble a set from its two position grids.
    ///
    /// Fails with [`DriftStepError::ShapeMismatch`] when the grids disagree in
    /// shape and with [`DriftStepError::EmptyTrajectorySet`] when they hold no
    /// particles or no samples. `index` only labels the error.
    pub fn from_parts(
        index: usize,
        lat: DMatrix<f64>,
        lon: DMatrix<f64>,
    ) -> Result<Self, DriftStepError> {
        if lat.shape() != lon.shape() {
            return Err(DriftStepError::ShapeMismatch {
                index,
                expected: lat.shape(),
                actual: lon.shape(),
            });
        }
        if lat.nrows() == 0 || lat.ncols() == 0 {
            return Err(DriftStepError::EmptyTrajectorySet(index));
        }
        Ok(TrajectorySet { lat, lon })
    }

    /// Number of particles (rows).
    pub fn particles(&self) -> usize {
        self.lat.nrows()
    }

    /// Number of recorded samples per particle (columns).
    pub fn samples(&self) -> usize {
        self.lat.ncols()
    }

    /// (particles, samples) pair, the comparison key of the scan.
    pub fn shape(&self) -> (usize, usize) {
        self.lat.shape()
    }

    pub fn lat(&self) -> &DMatrix<f64> {
        &self.lat
    }

    pub fn lon(&self) -> &DMatrix<f64> {
        &self.lon
    }

    /// Position of the first particle at the first sample, (lat, lon) degrees.
    pub fn initial_position(&self) -> (Degree, Degree) {
        (self.lat[(0, 0)], self.lon[(0, 0)])
    }
}

/// Peak advective forcing of one run: largest current and wind components
/// found in the result file, m/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForcingPeaks {
    pub sea_u: MeterPerSecond,
    pub sea_v: MeterPerSecond,
    pub wind_u: MeterPerSecond,
    pub wind_v: MeterPerSecond,
}

/// Read access to materialized simulation results, by simulation index.
///
/// A missing result is surfaced as [`DriftStepError::MissingResultFile`]
/// naming the index and the expected path; the scan treats it as fatal.
pub trait ResultStore {
    /// Load the (particle × sample) position grids of simulation `index`.
    fn load_trajectories(&self, index: usize) -> Result<TrajectorySet, DriftStepError>;

    /// Load the peak current/wind components of simulation `index`.
    fn load_forcing_peaks(&self, index: usize) -> Result<ForcingPeaks, DriftStepError>;
}
