//! NetCDF-backed result store.
//!
//! Reads the files the drift simulator writes under `<root>/raw/`: positions
//! as `lat`/`lon` grids shaped \[particle\]\[sample\], forcing as
//! `x_sea_water_velocity`/`y_sea_water_velocity`/`x_wind`/`y_wind` arrays with
//! a leading time dimension. Only the named fields are copied out; the file
//! handle is dropped as soon as the read completes.

use camino::{Utf8Path, Utf8PathBuf};
use nalgebra::DMatrix;

use super::{result_file_name, ForcingPeaks, ResultStore, TrajectorySet};
use crate::driftstep_errors::DriftStepError;

const SEA_U: &str = "x_sea_water_velocity";
const SEA_V: &str = "y_sea_water_velocity";
const WIND_U: &str = "x_wind";
const WIND_V: &str = "y_wind";

/// Result store rooted at a simulation results folder.
#[derive(Debug, Clone)]
pub struct NetcdfStore {
    root: Utf8PathBuf,
}

impl NetcdfStore {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        NetcdfStore { root: root.into() }
    }

    /// Expected location of the result file for simulation `index`.
    pub fn result_path(&self, index: usize) -> Utf8PathBuf {
        self.root.join("raw").join(result_file_name(index))
    }

    fn open(&self, index: usize) -> Result<(netcdf::File, Utf8PathBuf), DriftStepError> {
        let path = self.result_path(index);
        if !path.exists() {
            return Err(DriftStepError::MissingResultFile { index, path });
        }
        let file = netcdf::open(path.as_std_path())?;
        Ok((file, path))
    }

    /// Read a rank-2 variable into a row-major (particle × sample) matrix.
    fn grid_variable(
        file: &netcdf::File,
        name: &str,
        path: &Utf8Path,
    ) -> Result<DMatrix<f64>, DriftStepError> {
        let var = file
            .variable(name)
            .ok_or_else(|| DriftStepError::MissingVariable {
                name: name.to_string(),
                path: path.to_owned(),
            })?;

        let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        if dims.len() != 2 {
            return Err(DriftStepError::VariableRank {
                name: name.to_string(),
                path: path.to_owned(),
                expected: 2,
                actual: dims.len(),
            });
        }

        let values: Vec<f64> = var.get_values(..)?;
        Ok(DMatrix::from_row_slice(dims[0], dims[1], &values))
    }

    /// Peak value of a variable's first slice along its leading dimension.
    fn leading_peak(
        file: &netcdf::File,
        name: &str,
        path: &Utf8Path,
    ) -> Result<f64, DriftStepError> {
        let grid = Self::grid_variable(file, name, path)?;
        Ok(grid.row(0).iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }
}

impl ResultStore for NetcdfStore {
    fn load_trajectories(&self, index: usize) -> Result<TrajectorySet, DriftStepError> {
        let (file, path) = self.open(index)?;
        let lat = Self::grid_variable(&file, "lat", &path)?;
        let lon = Self::grid_variable(&file, "lon", &path)?;
        TrajectorySet::from_parts(index, lat, lon)
    }

    fn load_forcing_peaks(&self, index: usize) -> Result<ForcingPeaks, DriftStepError> {
        let (file, path) = self.open(index)?;
        Ok(ForcingPeaks {
            sea_u: Self::leading_peak(&file, SEA_U, &path)?,
            sea_v: Self::leading_peak(&file, SEA_V, &path)?,
            wind_u: Self::leading_peak(&file, WIND_U, &path)?,
            wind_v: Self::leading_peak(&file, WIND_V, &path)?,
        })
    }
}
