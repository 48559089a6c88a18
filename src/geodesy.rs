//! Great-circle distances on the spherical Earth used throughout the estimator.

use nalgebra::DMatrix;

use crate::constants::{Degree, Meter, EARTH_RADIUS_KM, METERS_PER_KILOMETER};

/// Haversine distance in meters between two (latitude, longitude) pairs in degrees.
///
/// Longitude wrap-around is not special-cased: the simulated domains are narrow
/// enough that trajectories never straddle the antimeridian.
pub fn haversine_m(lat1: Degree, lon1: Degree, lat2: Degree, lon2: Degree) -> Meter {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c * METERS_PER_KILOMETER
}

/// Element-wise haversine distance over equally-shaped position grids.
///
/// The output has the same shape as the inputs: entry (i, j) is the distance in
/// meters between position (i, j) of the first grid and position (i, j) of the
/// second.
///
/// Panics if the four grids do not share one shape. Callers compare shapes
/// before invoking (the scan skips mismatched candidates).
pub fn haversine_grid(
    lat1: &DMatrix<f64>,
    lon1: &DMatrix<f64>,
    lat2: &DMatrix<f64>,
    lon2: &DMatrix<f64>,
) -> DMatrix<f64> {
    assert_eq!(lat1.shape(), lon1.shape(), "lat/lon grids differ in shape");
    assert_eq!(lat1.shape(), lat2.shape(), "position grids differ in shape");
    assert_eq!(lat2.shape(), lon2.shape(), "lat/lon grids differ in shape");

    let (nrows, ncols) = lat1.shape();
    DMatrix::from_fn(nrows, ncols, |r, c| {
        haversine_m(lat1[(r, c)], lon1[(r, c)], lat2[(r, c)], lon2[(r, c)])
    })
}
