mod common;

use std::cell::RefCell;

use camino::Utf8PathBuf;
use common::chained_store;
use driftstep::config::load_config_list;
use driftstep::{
    DriftStepError, EstimatorParams, IntegrationScheme, SimulationConfig, SimulationRunner,
    TimestepEstimator,
};

fn five_step_estimator() -> TimestepEstimator {
    let params = EstimatorParams::builder()
        .number_of_simulations(5)
        .build()
        .unwrap();
    TimestepEstimator::new(SimulationConfig::default(), params).unwrap()
}

#[test]
fn derived_configs_carry_the_candidate_overrides() {
    let estimator = five_step_estimator();
    let configs = estimator.derive_configs().unwrap();

    let timesteps: Vec<u32> = configs.iter().map(|c| c.time_step).collect();
    assert_eq!(timesteps, vec![86_400, 43_200, 21_600, 10_800, 5_400]);

    for (i, config) in configs.iter().enumerate() {
        assert_eq!(config.simulation_id, i);
        assert_eq!(config.spill_lat, -25.0);
        assert_eq!(config.output_time_step, 86_400);
    }
}

#[test]
fn config_list_round_trips_through_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("sim_configs_list.yaml")).unwrap();

    let estimator = five_step_estimator();
    let written = estimator.generate_config_list(&path, false).unwrap();
    let loaded = load_config_list(&path).unwrap();
    assert_eq!(written, loaded);
}

#[test]
fn existing_list_is_a_conflict_unless_overwriting() {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("sim_configs_list.yaml")).unwrap();

    let estimator = five_step_estimator();
    estimator.generate_config_list(&path, false).unwrap();

    assert!(matches!(
        estimator.generate_config_list(&path, false),
        Err(DriftStepError::ExistingOutputConflict(conflict)) if conflict == path
    ));
    estimator.generate_config_list(&path, true).unwrap();
}

/// Runner double recording each dispatched simulation.
#[derive(Default)]
struct RecordingRunner {
    runs: RefCell<Vec<(usize, IntegrationScheme)>>,
}

impl SimulationRunner for RecordingRunner {
    fn run(
        &self,
        config: &SimulationConfig,
        _verbose: bool,
        scheme: IntegrationScheme,
    ) -> Result<(), DriftStepError> {
        self.runs.borrow_mut().push((config.simulation_id, scheme));
        Ok(())
    }
}

#[test]
fn candidates_are_dispatched_to_the_runner_in_index_order() {
    let estimator = five_step_estimator();
    let configs = estimator.derive_configs().unwrap();

    let runner = RecordingRunner::default();
    estimator
        .run_candidates(&runner, &configs, false, IntegrationScheme::RungeKutta4)
        .unwrap();

    let runs = runner.runs.borrow();
    assert_eq!(runs.len(), 5);
    for (i, (id, scheme)) in runs.iter().enumerate() {
        assert_eq!(*id, i);
        assert_eq!(*scheme, IntegrationScheme::RungeKutta4);
    }
}

#[test]
fn estimate_selects_the_first_converged_candidate() {
    let estimator = five_step_estimator();
    let configs = estimator.derive_configs().unwrap();
    let store = chained_store(&[500.0, 220.0, 80.0, 30.0]);

    let report = estimator.estimate(&store, &configs).unwrap();
    assert!(report.result.converged);
    assert_eq!(report.result.best_timestep, 10_800);

    let rendered = format!("{}", report.show());
    assert!(rendered.contains("10800"));
    assert!(rendered.contains("Converged"));
}

#[test]
fn short_sim_lists_are_rejected() {
    let estimator = five_step_estimator();
    let configs = estimator.derive_configs().unwrap();
    let store = chained_store(&[500.0, 220.0, 80.0, 30.0]);

    assert!(matches!(
        estimator.estimate(&store, &configs[..3]),
        Err(DriftStepError::InvalidConfigList(_))
    ));
}

#[test]
fn invalid_reference_is_rejected_at_construction() {
    let reference = SimulationConfig {
        start_date: "not-a-date".to_string(),
        ..SimulationConfig::default()
    };
    assert!(matches!(
        TimestepEstimator::new(reference, EstimatorParams::default()),
        Err(DriftStepError::InvalidDate(_))
    ));
}
