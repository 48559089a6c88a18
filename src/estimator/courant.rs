//! Courant-number diagnostic.
//!
//! One-shot, post-scan sanity check: how far does the peak advective transport
//! carry a particle in one integration step, relative to the size of one
//! ocean-data grid cell at the seeding location. The wind contributes the
//! fixed wind-drift fraction of its speed to the advective velocity. The
//! numbers are informational only; no threshold is enforced here.

use std::fmt;

use crate::constants::{Degree, Meter, Seconds, WIND_DRIFT_FRACTION};
use crate::geodesy::haversine_m;
use crate::results::{ForcingPeaks, TrajectorySet};

/// Courant numbers of the selected time step, with the intermediate quantities
/// they were computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourantDiagnostic {
    /// Zonal Courant number, dimensionless.
    pub cx: f64,
    /// Meridional Courant number, dimensionless.
    pub cy: f64,
    /// Physical width of one grid cell at the seeding latitude, meters.
    pub cell_width_m: Meter,
    /// Physical height of one grid cell, meters.
    pub cell_height_m: Meter,
    pub peaks: ForcingPeaks,
    pub time_step: Seconds,
}

/// Compute the Courant numbers for `time_step` from the finest run's forcing
/// peaks and initial particle position.
///
/// The cell extents are measured with the same haversine distance the scan
/// uses, offsetting longitude respectively latitude by one grid resolution.
pub fn courant_numbers(
    finest: &TrajectorySet,
    peaks: &ForcingPeaks,
    time_step: Seconds,
    grid_resolution: Degree,
) -> CourantDiagnostic {
    let (lat0, lon0) = finest.initial_position();
    let cell_width_m = haversine_m(lat0, lon0, lat0, lon0 + grid_resolution);
    let cell_height_m = haversine_m(lat0, lon0, lat0 + grid_resolution, lon0);

    let dt = f64::from(time_step);
    let cx = (peaks.sea_u + WIND_DRIFT_FRACTION * peaks.wind_u) * dt / cell_width_m;
    let cy = (peaks.sea_v + WIND_DRIFT_FRACTION * peaks.wind_v) * dt / cell_height_m;

    CourantDiagnostic {
        cx,
        cy,
        cell_width_m,
        cell_height_m,
        peaks: *peaks,
        time_step,
    }
}

impl fmt::Display for CourantDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Peak zonal wind (m/s)        : {:.3}", self.peaks.wind_u)?;
        writeln!(f, "Peak meridional wind (m/s)   : {:.3}", self.peaks.wind_v)?;
        writeln!(f, "Peak zonal current (m/s)     : {:.3}", self.peaks.sea_u)?;
        writeln!(f, "Peak meridional current (m/s): {:.3}", self.peaks.sea_v)?;
        writeln!(f, "Grid cell width (m)          : {:.1}", self.cell_width_m)?;
        writeln!(f, "Grid cell height (m)         : {:.1}", self.cell_height_m)?;
        writeln!(f, "Courant number Cx            : {:.4}", self.cx)?;
        write!(f, "Courant number Cy            : {:.4}", self.cy)
    }
}
