//! Shared constants for the telemetry core
//!
//! Centralizes the wire-format and scoring parameters so the codec, the
//! aggregator and the scoring engine cannot drift apart. Values that came
//! out of the original ground-station tuning (history cap, score weights)
//! live here rather than inline at their call sites.

/// Field delimiter for the telemetry wire line
pub const LINE_DELIMITER: char = ',';

/// Decimal places used when encoding most numeric fields
pub const FIELD_PRECISION: usize = 2;

/// Decimal places used when encoding latitude and longitude
///
/// Six decimals is roughly 0.1 m of ground resolution, which is well below
/// GPS accuracy but keeps round-trips lossless for drift tracking.
pub const GEO_PRECISION: usize = 6;

/// Maximum encoded line length in bytes
///
/// Ten numeric fields at full width plus a phase token fit comfortably;
/// the margin covers the legacy speed field.
pub const MAX_LINE_LEN: usize = 256;

/// Maximum phase token length in bytes (inline storage, no allocation)
///
/// Longest known token is `SECOND DEPLOY` (13 bytes); real boards have
/// been observed emitting slightly longer free-text phases.
pub const MAX_PHASE_TOKEN: usize = 23;

/// Header token that identifies a column-header row on the wire
pub const HEADER_TOKEN: &str = "accel_x";

/// Default cap on per-board history entries
///
/// At the nominal 2 Hz sample rate this holds well over an hour of flight.
pub const DEFAULT_HISTORY_CAP: usize = 10_000;

/// Mean Earth radius in meters, used by the local planar projection
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Maximum apogee-accuracy score
pub const APOGEE_SCORE_MAX: f64 = 15.0;

/// Maximum landing-distance score
pub const DISTANCE_SCORE_MAX: f64 = 7.5;

/// Landing displacement (meters) at and beyond which the distance score is zero
pub const DISTANCE_CUTOFF_M: f64 = 500.0;
