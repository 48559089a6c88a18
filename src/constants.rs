//! # Constants and type definitions for driftstep
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! definitions** used throughout the `driftstep` library.
//!
//! ## Overview
//!
//! - Geophysical constants (Earth radius, seconds per day)
//! - Empirical drift factors shared with the wrapped simulator
//! - Grid resolution of the ocean-data provider
//! - Core type aliases used across the crate
//!
//! These definitions are used by all main modules, including the geodesy primitives,
//! the candidate builder, and the convergence estimator.

use crate::candidates::TimestepCandidate;
use smallvec::SmallVec;

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Earth radius in kilometers used by the haversine distance
pub const EARTH_RADIUS_KM: f64 = 6378.137;

/// Kilometers → meters
pub const METERS_PER_KILOMETER: f64 = 1000.0;

/// Number of seconds in a day, the usual output sampling interval
pub const SECONDS_PER_DAY: Seconds = 86_400;

/// Fraction of the wind speed contributing to surface drift (wind drift factor)
pub const WIND_DRIFT_FRACTION: f64 = 0.03;

/// Angular resolution of the ocean-data grid, degrees per cell in both axes
pub const GRID_RESOLUTION_DEG: Degree = 0.083;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Distance in meters
pub type Meter = f64;
/// Velocity in meters per second
pub type MeterPerSecond = f64;
/// Duration in whole seconds (integration and output intervals)
pub type Seconds = u32;

/// A small, inline-optimized container for the candidate time-step sequence.
pub type Candidates = SmallVec<[TimestepCandidate; 16]>;
