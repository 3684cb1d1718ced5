//! Flight Scoring Engine
//!
//! Derives a bounded accuracy score for a completed (or in-progress)
//! flight from two observations:
//!
//! - **Apogee accuracy** - how close the observed peak altitude came to a
//!   user-supplied prediction:
//!
//!   ```text
//!   ratio        = (max_altitude - predicted) / predicted
//!   apogee_score = 15 / (1 + ratio²)
//!   ```
//!
//!   Bounded in (0, 15], maximal at a perfect prediction, falling off
//!   smoothly and symmetrically in |ratio|.
//!
//! - **Landing displacement** - planar distance between the first and last
//!   recorded positions, linear ramp from 7.5 points at 0 m down to zero
//!   at 500 m (clamped, never negative):
//!
//!   ```text
//!   distance_score = 7.5 × max(0, 1 - d / 500)
//!   ```
//!
//! Total is the sum, in [0, 22.5]. A score is *unavailable* (not zero)
//! when no prediction exists or fewer than two positions were recorded;
//! zero is a legitimate score and must not be conflated with absence.
//!
//! ## Distance projection
//!
//! Displacement uses an equirectangular projection local to the launch
//! point. The exact form is part of the wire-compatibility contract with
//! other ground-station implementations and must not be "improved":
//!
//! ```text
//! R  = 6,371,000 m
//! x  = Δlon_rad × R × cos(mid_lat_rad)
//! y  = Δlat_rad × R
//! d  = √(x² + y²)
//! ```

use crate::constants::{
    APOGEE_SCORE_MAX, DISTANCE_CUTOFF_M, DISTANCE_SCORE_MAX, EARTH_RADIUS_M,
};
use crate::reading::GeoPoint;

/// Score breakdown for one board's flight
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlightScore {
    /// Apogee-accuracy component, (0, 15]
    pub apogee: f64,
    /// Landing-displacement component, [0, 7.5]
    pub distance: f64,
}

impl FlightScore {
    /// Combined score, [0, 22.5]
    pub fn total(&self) -> f64 {
        self.apogee + self.distance
    }
}

/// Degrees to radians without pulling in std float math
fn radians(deg: f64) -> f64 {
    deg * core::f64::consts::PI / 180.0
}

/// Planar distance in meters between two points, projected around `origin`
pub fn planar_distance_m(origin: GeoPoint, point: GeoPoint) -> f64 {
    let dlat = radians(point.lat() - origin.lat());
    let dlon = radians(point.lon() - origin.lon());
    let mid_lat = radians((point.lat() + origin.lat()) / 2.0);
    let x = dlon * EARTH_RADIUS_M * libm::cos(mid_lat);
    let y = dlat * EARTH_RADIUS_M;
    libm::sqrt(x * x + y * y)
}

/// Apogee-accuracy score
///
/// `None` when the prediction is not a finite positive number; the save
/// path does not validate, so the scoring path must.
pub fn apogee_score(max_altitude: f64, predicted_apogee: f64) -> Option<f64> {
    if !predicted_apogee.is_finite() || predicted_apogee <= 0.0 {
        return None;
    }
    let ratio = (max_altitude - predicted_apogee) / predicted_apogee;
    Some(APOGEE_SCORE_MAX / (1.0 + ratio * ratio))
}

/// Landing-displacement score, zero at and beyond the 500 m cutoff
pub fn distance_score(distance_m: f64) -> f64 {
    DISTANCE_SCORE_MAX * (1.0 - distance_m / DISTANCE_CUTOFF_M).max(0.0)
}

/// Score a flight from its peak altitude, prediction and end positions
pub fn score_flight(
    max_altitude: f64,
    predicted_apogee: f64,
    launch: GeoPoint,
    last: GeoPoint,
) -> Option<FlightScore> {
    let apogee = apogee_score(max_altitude, predicted_apogee)?;
    let distance = distance_score(planar_distance_m(launch, last));
    Some(FlightScore { apogee, distance })
}
