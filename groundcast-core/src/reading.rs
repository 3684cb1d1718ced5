//! Telemetry reading types
//!
//! One [`TelemetryReading`] is a single sensor sample from a single board
//! at a single instant. Readings are immutable once constructed; the
//! constructors enforce the model invariants (latitude clamped, longitude
//! wrapped, humidity clamped to 0-100%, altitude non-negative) so every
//! reading in the system is already normalized.

use crate::phase::PhaseToken;

/// Three-axis acceleration sample
///
/// Units follow the producing board (g-like ranges from the simulator);
/// the core does not convert units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3 {
    /// X axis
    pub x: f64,
    /// Y axis
    pub y: f64,
    /// Z axis (up, positive during boost)
    pub z: f64,
}

impl Vector3 {
    /// Create a new vector
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A geodetic position, normalized at construction
///
/// Latitude is clamped to [-90, 90]; longitude is wrapped into
/// [-180, 180) by euclidean modulo, so 190 degrees becomes -170.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Create a normalized position from raw latitude/longitude degrees
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: lat.clamp(-90.0, 90.0),
            lon: wrap_longitude(lon),
        }
    }

    /// Latitude in degrees, in [-90, 90]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees, in [-180, 180)
    pub const fn lon(&self) -> f64 {
        self.lon
    }
}

/// Wrap a longitude in degrees into [-180, 180)
fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0) % 360.0;
    let wrapped = if wrapped < 0.0 { wrapped + 360.0 } else { wrapped };
    wrapped - 180.0
}

/// One decoded or generated sensor sample
///
/// `speed` is carried only by the legacy 11-field wire schema; the
/// canonical schema has no speed column and decodes it as `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryReading {
    /// Acceleration vector
    pub accel: Vector3,
    /// GPS position
    pub position: GeoPoint,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Barometric pressure in Pa
    pub pressure: f64,
    /// Relative humidity in percent, clamped to [0, 100]
    pub humidity: f64,
    /// Altitude above ground in meters, clamped non-negative
    pub altitude: f64,
    /// Ground speed in m/s, legacy schema only
    pub speed: Option<f64>,
    /// Raw flight phase token as received
    pub phase: PhaseToken,
}

impl TelemetryReading {
    /// Construct a reading, applying the model invariants
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        accel: Vector3,
        position: GeoPoint,
        temperature: f64,
        pressure: f64,
        humidity: f64,
        altitude: f64,
        phase: PhaseToken,
    ) -> Self {
        Self {
            accel,
            position,
            temperature,
            pressure,
            humidity: humidity.clamp(0.0, 100.0),
            altitude: altitude.max(0.0),
            speed: None,
            phase,
        }
    }

    /// Attach a legacy-schema speed value
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::FlightPhase;

    #[test]
    fn longitude_wraps_into_range() {
        assert_eq!(GeoPoint::new(0.0, 190.0).lon(), -170.0);
        assert_eq!(GeoPoint::new(0.0, -190.0).lon(), 170.0);
        assert_eq!(GeoPoint::new(0.0, 180.0).lon(), -180.0);
        assert_eq!(GeoPoint::new(0.0, 540.0).lon(), -180.0);
        assert_eq!(GeoPoint::new(0.0, 90.002345).lon(), 90.002345);
    }

    #[test]
    fn latitude_clamps() {
        assert_eq!(GeoPoint::new(95.0, 0.0).lat(), 90.0);
        assert_eq!(GeoPoint::new(-120.0, 0.0).lat(), -90.0);
        assert_eq!(GeoPoint::new(30.001234, 0.0).lat(), 30.001234);
    }

    #[test]
    fn reading_clamps_humidity_and_altitude() {
        let reading = TelemetryReading::new(
            Vector3::new(0.0, 0.0, 9.8),
            GeoPoint::new(30.0, 90.0),
            22.0,
            1013.0,
            140.0,
            -12.0,
            PhaseToken::from(FlightPhase::Ground),
        );
        assert_eq!(reading.humidity, 100.0);
        assert_eq!(reading.altitude, 0.0);
        assert_eq!(reading.speed, None);
    }
}
