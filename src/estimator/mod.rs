//! # Time-step convergence estimation
//!
//! This module defines the [`EstimatorParams`] configuration struct with its
//! validating builder, and the [`TimestepEstimator`] façade that wires the
//! whole study together:
//!
//! 1. **Candidate generation** – derive the corrected, exponentially-decreasing
//!    time-step sequence from the reference configuration
//!    ([`TimestepEstimator::candidate_timesteps`]).
//! 2. **Configuration fan-out** – one [`SimulationConfig`] per candidate,
//!    persisted as an ordered YAML list
//!    ([`TimestepEstimator::generate_config_list`]).
//! 3. **Simulation driving** – hand each record to the external runner, in
//!    index order ([`TimestepEstimator::run_candidates`]).
//! 4. **Scan** – compare each materialized result against its immediate
//!    predecessor and pick the coarsest converged time step
//!    ([`TimestepEstimator::estimate`]).
//! 5. **Diagnostics** – Courant numbers of the selected step, from the finest
//!    run ([`TimestepEstimator::courant`]).
//!
//! ## Example
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use driftstep::config::SimulationConfig;
//! use driftstep::estimator::{EstimatorParams, TimestepEstimator};
//! use driftstep::results::memory::InMemoryStore;
//!
//! # fn demo() -> Result<(), driftstep::driftstep_errors::DriftStepError> {
//! let params = EstimatorParams::builder()
//!     .number_of_simulations(10)
//!     .tolerance_m(50.0)
//!     .build()?;
//! let estimator = TimestepEstimator::new(SimulationConfig::default(), params)?;
//!
//! let configs = estimator.generate_config_list(
//!     Utf8Path::new("conf/timesteps_sim_configs_list.yaml"),
//!     false,
//! )?;
//!
//! // ... run the simulations through an external runner, then:
//! # let store = InMemoryStore::new();
//! let report = estimator.estimate(&store, &configs)?;
//! println!("{}", report.show());
//! # Ok(()) }
//! ```

pub mod courant;
pub mod scan;

use std::cmp::Ordering::Greater;
use std::fmt;

use camino::Utf8Path;

use crate::config::{save_config_list, timestep_sequence, SimulationConfig};
use crate::constants::{Candidates, Meter, GRID_RESOLUTION_DEG};
use crate::driftstep_errors::DriftStepError;
use crate::results::ResultStore;
use crate::runner::{IntegrationScheme, SimulationRunner};
use courant::CourantDiagnostic;
use scan::ScanReport;

/// Tunable parameters of one convergence study.
///
/// Fields
/// -----------------
/// * `number_of_simulations` – how many candidate time steps the study spans;
///   candidate 0 is the reference-adjacent coarse step, the last is the finest.
/// * `tolerance_m` – convergence tolerance in meters; the first candidate whose
///   mean lookahead error falls strictly below it is selected.
/// * `sample_lookahead` – output sample the scalar error is taken at; negative
///   values count from the end (-1 = last recorded sample).
///
/// Defaults
/// -----------------
/// 15 simulations, 100 m tolerance, lookahead -1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorParams {
    pub number_of_simulations: usize,
    pub tolerance_m: Meter,
    pub sample_lookahead: isize,
}

impl EstimatorParams {
    /// Construct parameters with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`EstimatorParamsBuilder`] to override the defaults
    /// step by step.
    pub fn builder() -> EstimatorParamsBuilder {
        EstimatorParamsBuilder::new()
    }
}

impl Default for EstimatorParams {
    fn default() -> Self {
        EstimatorParams {
            number_of_simulations: 15,
            tolerance_m: 100.0,
            sample_lookahead: -1,
        }
    }
}

/// Builder for [`EstimatorParams`], with validation.
#[derive(Debug, Clone)]
pub struct EstimatorParamsBuilder {
    params: EstimatorParams,
}

impl Default for EstimatorParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EstimatorParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: EstimatorParams::default(),
        }
    }

    pub fn number_of_simulations(mut self, v: usize) -> Self {
        self.params.number_of_simulations = v;
        self
    }

    pub fn tolerance_m(mut self, v: Meter) -> Self {
        self.params.tolerance_m = v;
        self
    }

    pub fn sample_lookahead(mut self, v: isize) -> Self {
        self.params.sample_lookahead = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater))
    }

    /// Finalize the builder and produce an [`EstimatorParams`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// * `number_of_simulations >= 2` – a scan compares successive candidates.
    /// * `tolerance_m > 0` and finite.
    pub fn build(self) -> Result<EstimatorParams, DriftStepError> {
        let p = &self.params;
        if p.number_of_simulations < 2 {
            return Err(DriftStepError::InvalidEstimatorParameter(
                "number_of_simulations must be >= 2".into(),
            ));
        }
        if !Self::gt0(p.tolerance_m) || !p.tolerance_m.is_finite() {
            return Err(DriftStepError::InvalidEstimatorParameter(
                "tolerance_m must be > 0 and finite".into(),
            ));
        }
        Ok(self.params)
    }
}

impl fmt::Display for EstimatorParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Time-step Convergence Parameters")?;
            writeln!(f, "--------------------------------")?;
            writeln!(
                f,
                "  number_of_simulations = {:<8} # Candidate time steps in the study",
                self.number_of_simulations
            )?;
            writeln!(
                f,
                "  tolerance_m           = {:<8.1} # Convergence tolerance (m)",
                self.tolerance_m
            )?;
            write!(
                f,
                "  sample_lookahead      = {:<8} # Sample offset, negative from the end",
                self.sample_lookahead
            )
        } else {
            write!(
                f,
                "EstimatorParams(n={}, tolerance={:.1}m, lookahead={})",
                self.number_of_simulations, self.tolerance_m, self.sample_lookahead
            )
        }
    }
}

/// Façade of the convergence study: a reference scenario plus the study
/// parameters, with one method per stage of the pipeline.
#[derive(Debug, Clone)]
pub struct TimestepEstimator {
    reference: SimulationConfig,
    params: EstimatorParams,
}

impl TimestepEstimator {
    /// Build an estimator around a validated reference configuration.
    pub fn new(
        reference: SimulationConfig,
        params: EstimatorParams,
    ) -> Result<Self, DriftStepError> {
        reference.validate()?;
        Ok(TimestepEstimator { reference, params })
    }

    pub fn reference(&self) -> &SimulationConfig {
        &self.reference
    }

    pub fn params(&self) -> &EstimatorParams {
        &self.params
    }

    /// Corrected candidate sequence for this study, coarsest first.
    pub fn candidate_timesteps(&self) -> Result<Candidates, DriftStepError> {
        crate::candidates::build_candidates(
            self.reference.time_step,
            self.reference.output_time_step,
            self.params.number_of_simulations,
        )
    }

    /// One configuration record per candidate, in simulation-index order.
    pub fn derive_configs(&self) -> Result<Vec<SimulationConfig>, DriftStepError> {
        Ok(self
            .candidate_timesteps()?
            .iter()
            .map(|candidate| {
                self.reference
                    .with_candidate(candidate.index, candidate.time_step)
            })
            .collect())
    }

    /// Derive the per-candidate configurations and persist them as a YAML list.
    ///
    /// An existing list without `overwrite` is rejected before any candidate
    /// is computed.
    pub fn generate_config_list(
        &self,
        path: &Utf8Path,
        overwrite: bool,
    ) -> Result<Vec<SimulationConfig>, DriftStepError> {
        if path.exists() && !overwrite {
            return Err(DriftStepError::ExistingOutputConflict(path.to_owned()));
        }
        let configs = self.derive_configs()?;
        save_config_list(path, &configs, overwrite)?;
        Ok(configs)
    }

    /// Drive the external runner over the candidate configurations, in index
    /// order. Scheduling beyond this sequential walk is the runner's concern.
    pub fn run_candidates<R: SimulationRunner>(
        &self,
        runner: &R,
        configs: &[SimulationConfig],
        verbose: bool,
        scheme: IntegrationScheme,
    ) -> Result<(), DriftStepError> {
        for config in configs {
            runner.run(config, verbose, scheme)?;
        }
        Ok(())
    }

    /// Run the convergence scan against materialized results.
    ///
    /// `sim_list` is the loaded configuration list; it must cover at least
    /// `number_of_simulations` records, in the order the results were produced.
    pub fn estimate<S: ResultStore + ?Sized>(
        &self,
        store: &S,
        sim_list: &[SimulationConfig],
    ) -> Result<ScanReport, DriftStepError> {
        let n = self.params.number_of_simulations;
        if sim_list.len() < n {
            return Err(DriftStepError::InvalidConfigList(format!(
                "{} simulation records for a study of {n}",
                sim_list.len()
            )));
        }
        let timesteps = timestep_sequence(&sim_list[..n]);
        scan::run_scan(
            store,
            &timesteps,
            self.params.tolerance_m,
            self.params.sample_lookahead,
        )
    }

    /// Courant numbers of the selected time step, computed from the finest
    /// available result.
    pub fn courant<S: ResultStore + ?Sized>(
        &self,
        store: &S,
        report: &ScanReport,
    ) -> Result<CourantDiagnostic, DriftStepError> {
        let finest = report.timesteps.len() - 1;
        let trajectories = store.load_trajectories(finest)?;
        let peaks = store.load_forcing_peaks(finest)?;
        Ok(courant::courant_numbers(
            &trajectories,
            &peaks,
            report.result.best_timestep,
            GRID_RESOLUTION_DEG,
        ))
    }
}
