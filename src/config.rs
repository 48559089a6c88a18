//! # Simulation configuration records and the configuration-list file
//!
//! One [`SimulationConfig`] record fully describes one drift-simulator run:
//! the spatial domain, the seeding of particles, the simulated date range, and
//! the integration/output time steps. The convergence study derives one record
//! per candidate time step from a single reference record and persists the
//! whole family as a YAML list, in simulation-index order.
//!
//! ## Contracts
//!
//! - The list is ordered: entry i corresponds to result file index i.
//! - Every record exposes `time_step` in seconds; the estimator consumes the
//!   list solely through [`timestep_sequence`].
//! - Writing a list over an existing file without the overwrite flag fails
//!   with [`DriftStepError::ExistingOutputConflict`] before anything is
//!   computed or touched on disk.

use std::fs;

use camino::Utf8Path;
use hifitime::Epoch;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::{Degree, Seconds, SECONDS_PER_DAY};
use crate::driftstep_errors::DriftStepError;

/// Parameters of a single drift-simulator run.
///
/// Field names follow the wrapped simulator's configuration surface, so a
/// serialized record can be handed to the runner unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Index of this run; also determines the result file name.
    pub simulation_id: usize,
    /// Simulated range start, `YYYY-MM-DD`.
    pub start_date: String,
    /// Simulated range end, `YYYY-MM-DD`.
    pub end_date: String,
    /// Western edge of the active domain; particles are deactivated beyond it.
    pub min_lon: Degree,
    pub max_lon: Degree,
    pub min_lat: Degree,
    pub max_lat: Degree,
    /// Seeding location of the spill.
    pub spill_lon: Degree,
    pub spill_lat: Degree,
    /// Seeding radius in meters.
    pub spill_radius: f64,
    /// Number of particles seeded at the spill location.
    pub num_seed_elements: u32,
    /// Internal integration time step, seconds.
    pub time_step: Seconds,
    /// Output sampling interval, seconds.
    pub output_time_step: Seconds,
}

impl Default for SimulationConfig {
    /// Reference scenario: a ten-day spill off the Brazilian south-east coast.
    fn default() -> Self {
        SimulationConfig {
            simulation_id: 0,
            start_date: "2023-05-01".to_string(),
            end_date: "2023-05-10".to_string(),
            min_lon: -46.0,
            max_lon: -37.0,
            min_lat: -27.0,
            max_lat: -21.0,
            spill_lon: -39.0,
            spill_lat: -25.0,
            spill_radius: 6000.0,
            num_seed_elements: 100,
            time_step: SECONDS_PER_DAY,
            output_time_step: SECONDS_PER_DAY,
        }
    }
}

impl SimulationConfig {
    /// Check the record for internal consistency.
    ///
    /// Validates the date range (parseable, start strictly before end), the
    /// domain and spill coordinates, and the positivity of both time steps.
    /// The integer-ratio constraint between the two steps is *not* enforced
    /// here: candidate correction owns that rule.
    pub fn validate(&self) -> Result<(), DriftStepError> {
        let start = parse_date(&self.start_date)?;
        let end = parse_date(&self.end_date)?;
        if start >= end {
            return Err(DriftStepError::InvalidDateRange {
                start: self.start_date.clone(),
                end: self.end_date.clone(),
            });
        }

        for (name, lat) in [
            ("min_lat", self.min_lat),
            ("max_lat", self.max_lat),
            ("spill_lat", self.spill_lat),
        ] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(DriftStepError::InvalidConfig(format!(
                    "{name} = {lat} outside [-90, 90]"
                )));
            }
        }
        if self.min_lon >= self.max_lon || self.min_lat >= self.max_lat {
            return Err(DriftStepError::InvalidConfig(
                "domain bounds are empty or inverted".into(),
            ));
        }
        if self.time_step == 0 || self.output_time_step == 0 {
            return Err(DriftStepError::InvalidConfig(
                "time steps must be strictly positive".into(),
            ));
        }
        Ok(())
    }

    /// Derive the record for one candidate run: same scenario, overridden
    /// simulation index and integration time step.
    pub fn with_candidate(&self, index: usize, time_step: Seconds) -> Self {
        SimulationConfig {
            simulation_id: index,
            time_step,
            ..self.clone()
        }
    }
}

/// Parse a `YYYY-MM-DD` date into an [`Epoch`] at UTC midnight.
pub fn parse_date(date: &str) -> Result<Epoch, DriftStepError> {
    let invalid = || DriftStepError::InvalidDate(date.to_string());

    let mut parts = date.split('-');
    let (Some(y), Some(m), Some(d), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    let year: i32 = y.parse().map_err(|_| invalid())?;
    let month: u8 = m.parse().map_err(|_| invalid())?;
    let day: u8 = d.parse().map_err(|_| invalid())?;

    Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0).map_err(|_| invalid())
}

/// Persist the ordered configuration list as one YAML document.
///
/// Arguments
/// ---------
/// * `path`: destination of the YAML list; parent directories are created
/// * `configs`: the records, in simulation-index order
/// * `overwrite`: replace an existing file instead of failing
pub fn save_config_list(
    path: &Utf8Path,
    configs: &[SimulationConfig],
    overwrite: bool,
) -> Result<(), DriftStepError> {
    if path.exists() {
        if overwrite {
            info!(%path, "overwriting existing configuration list");
        } else {
            return Err(DriftStepError::ExistingOutputConflict(path.to_owned()));
        }
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_yaml::to_string(configs)?)?;
    Ok(())
}

/// Load a configuration list written by [`save_config_list`].
pub fn load_config_list(path: &Utf8Path) -> Result<Vec<SimulationConfig>, DriftStepError> {
    let configs: Vec<SimulationConfig> = serde_yaml::from_str(&fs::read_to_string(path)?)?;
    if configs.is_empty() {
        return Err(DriftStepError::InvalidConfigList(format!(
            "'{path}' holds no simulation records"
        )));
    }
    Ok(configs)
}

/// Extract the ordered time-step sequence from a configuration list.
pub fn timestep_sequence(configs: &[SimulationConfig]) -> Vec<Seconds> {
    configs.iter().map(|cfg| cfg.time_step).collect()
}
