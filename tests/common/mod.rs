use driftstep::results::memory::InMemoryStore;
use driftstep::TrajectorySet;
use nalgebra::DMatrix;

pub const EARTH_RADIUS_M: f64 = 6378.137e3;

/// A synthetic result set: particles spread slightly in latitude, samples
/// marching east, so grids are non-degenerate but analytically simple.
pub fn flat_set(
    index: usize,
    particles: usize,
    samples: usize,
    lat0: f64,
    lon0: f64,
) -> TrajectorySet {
    let lat = DMatrix::from_fn(particles, samples, |p, _| lat0 + 0.01 * p as f64);
    let lon = DMatrix::from_fn(particles, samples, |_, s| lon0 + 0.02 * s as f64);
    TrajectorySet::from_parts(index, lat, lon).unwrap()
}

/// Shift a whole set north by `meters`. A meridional offset is exact under the
/// haversine, so the distance to the source set is `meters` at every cell.
pub fn offset_north(set: &TrajectorySet, index: usize, meters: f64) -> TrajectorySet {
    let dlat = (meters / EARTH_RADIUS_M).to_degrees();
    TrajectorySet::from_parts(index, set.lat().map(|v| v + dlat), set.lon().clone()).unwrap()
}

/// Store whose set i differs from set i-1 by `errors[i-1]` meters at every
/// cell, mimicking a chain of runs that drift closer as the step refines.
pub fn chained_store(errors: &[f64]) -> InMemoryStore {
    let mut store = InMemoryStore::new();
    let mut previous = flat_set(0, 5, 12, -25.0, -39.0);
    store.push(previous.clone());
    for (i, &meters) in errors.iter().enumerate() {
        let next = offset_north(&previous, i + 1, meters);
        store.push(next.clone());
        previous = next;
    }
    store
}
