//! In-memory result store, for embedding and tests.
//!
//! Mirrors the on-disk layout slot for slot: slot i answers for simulation
//! index i, and an empty slot reports the same [`MissingResultFile`] the file
//! store would, naming the result file the simulator should have written.
//!
//! [`MissingResultFile`]: crate::driftstep_errors::DriftStepError::MissingResultFile

use camino::Utf8PathBuf;

use super::{result_file_name, ForcingPeaks, ResultStore, TrajectorySet};
use crate::driftstep_errors::DriftStepError;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    trajectories: Vec<Option<TrajectorySet>>,
    peaks: Vec<Option<ForcingPeaks>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result set at the next simulation index.
    pub fn push(&mut self, set: TrajectorySet) {
        self.trajectories.push(Some(set));
        self.peaks.push(None);
    }

    /// Append an empty slot: loads at this index fail like a missing file.
    pub fn push_missing(&mut self) {
        self.trajectories.push(None);
        self.peaks.push(None);
    }

    /// Attach forcing peaks to an already-pushed slot.
    pub fn set_peaks(&mut self, index: usize, peaks: ForcingPeaks) {
        self.peaks[index] = Some(peaks);
    }

    fn missing(index: usize) -> DriftStepError {
        DriftStepError::MissingResultFile {
            index,
            path: Utf8PathBuf::from(result_file_name(index)),
        }
    }
}

impl ResultStore for InMemoryStore {
    fn load_trajectories(&self, index: usize) -> Result<TrajectorySet, DriftStepError> {
        self.trajectories
            .get(index)
            .and_then(Option::as_ref)
            .cloned()
            .ok_or_else(|| Self::missing(index))
    }

    fn load_forcing_peaks(&self, index: usize) -> Result<ForcingPeaks, DriftStepError> {
        self.peaks
            .get(index)
            .and_then(Option::as_ref)
            .copied()
            .ok_or_else(|| Self::missing(index))
    }
}
