//! Contract with the external simulation runner.
//!
//! Running one drift simulation is delegated entirely to a collaborator: given
//! a configuration record it integrates the trajectories and deterministically
//! writes the result file named by the record's simulation index. How the
//! collaborator schedules independent runs (worker pools, remote execution) is
//! its own business; the estimator only requires that every result file exists
//! before a scan starts, and a missing file is its sole input-validation
//! signal.

use crate::config::SimulationConfig;
use crate::driftstep_errors::DriftStepError;

/// Numerical advection scheme the simulator integrates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegrationScheme {
    #[default]
    Euler,
    RungeKutta4,
}

/// One operation: run a single simulation and materialize its result file.
pub trait SimulationRunner {
    fn run(
        &self,
        config: &SimulationConfig,
        verbose: bool,
        scheme: IntegrationScheme,
    ) -> Result<(), DriftStepError>;
}
