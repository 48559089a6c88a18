use camino::Utf8PathBuf;
use thiserror::Error;

use crate::constants::Seconds;

/// Crate-level error taxonomy.
///
/// Fatal conditions carry enough context (index, expected path, expected vs. actual
/// shape) for the caller to act. [`DriftStepError::ShapeMismatch`] is the only
/// recoverable condition: the scan logs it and skips the offending candidate.
#[derive(Error, Debug)]
pub enum DriftStepError {
    #[error("integration time step cannot divide the output interval of {0} s without exceeding it")]
    TimestepExceedsOutputInterval(Seconds),

    #[error("result file for simulation {index} not found at: {path}")]
    MissingResultFile { index: usize, path: Utf8PathBuf },

    #[error("trajectory shape mismatch for simulation {index}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        index: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("configuration list '{0}' already exists; enable overwrite or rename the output")]
    ExistingOutputConflict(Utf8PathBuf),

    #[error("variable '{name}' not found in result file: {path}")]
    MissingVariable { name: String, path: Utf8PathBuf },

    #[error("variable '{name}' in {path} has rank {actual}, expected {expected}")]
    VariableRank {
        name: String,
        path: Utf8PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("result file for simulation {0} holds an empty trajectory set")]
    EmptyTrajectorySet(usize),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("start date {start} is not before end date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("invalid simulation configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid configuration list: {0}")]
    InvalidConfigList(String),

    #[error("invalid estimator parameter: {0}")]
    InvalidEstimatorParameter(String),

    #[error("sample lookahead {lookahead} is out of range for {samples} samples")]
    LookaheadOutOfRange { lookahead: isize, samples: usize },

    #[error("unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML (de)serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetcdfError(#[from] netcdf::Error),
}
