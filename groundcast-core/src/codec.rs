//! Telemetry Line Codec
//!
//! ## Wire format
//!
//! One reading per line, comma-delimited, numeric fields fixed-precision
//! (2 decimals, 6 for latitude/longitude), phase as an uppercase token:
//!
//! ```text
//! accel_x,accel_y,accel_z,lat,lon,temperature,pressure,humidity,altitude,phase
//! 0.12,-0.05,9.81,30.001234,90.002345,24.50,1013.25,55.30,12.40,GROUND
//! ```
//!
//! ## Schema versions
//!
//! The canonical schema is the 10-field layout above. One legacy dashboard
//! generation used an 11-field layout with a `speed` column between
//! `humidity` and `altitude`; that layout is still decodable, but only when
//! [`Schema::LegacySpeed`] is selected explicitly. The default codec is
//! strict: a line whose field count does not match the active schema fails
//! with [`DecodeError::WrongFieldCount`], never silent reinterpretation.
//!
//! ## Header rows
//!
//! Some sources echo their column header. A line whose first field is
//! `accel_x` (case-insensitive) decodes to [`Decoded::Header`] - a skip,
//! not an error - regardless of what the remaining fields contain.
//!
//! ## Phase handling
//!
//! The phase field is trimmed and upper-cased but *not* validated against
//! the closed phase enum here; unknown tokens flow through opaquely and
//! deploy detection downstream is substring-based. See [`crate::phase`].

use core::fmt::Write as _;

use crate::constants::{HEADER_TOKEN, LINE_DELIMITER, MAX_LINE_LEN};
use crate::errors::{DecodeError, DecodeResult, EncodeError};
use crate::phase::PhaseToken;
use crate::reading::{GeoPoint, TelemetryReading, Vector3};

/// Encoded line buffer, sized for the widest schema
pub type LineBuf = heapless::String<MAX_LINE_LEN>;

/// Wire schema selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schema {
    /// Canonical 10-field layout, no speed column
    #[default]
    Canonical,
    /// Legacy 11-field layout with `speed` between `humidity` and `altitude`
    LegacySpeed,
}

impl Schema {
    /// Number of fields a line of this schema carries
    pub const fn field_count(self) -> usize {
        match self {
            Schema::Canonical => 10,
            Schema::LegacySpeed => 11,
        }
    }
}

/// Outcome of decoding one line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoded {
    /// A telemetry reading
    Reading(TelemetryReading),
    /// A column-header row; skip silently
    Header,
}

impl Decoded {
    /// The reading, if this was not a header row
    pub fn into_reading(self) -> Option<TelemetryReading> {
        match self {
            Decoded::Reading(reading) => Some(reading),
            Decoded::Header => None,
        }
    }
}

/// Encoder/decoder for one wire schema
///
/// Stateless apart from the schema selection; cheap to copy around.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineCodec {
    schema: Schema,
}

impl LineCodec {
    /// Codec for the canonical 10-field schema
    pub const fn new() -> Self {
        Self {
            schema: Schema::Canonical,
        }
    }

    /// Codec for an explicitly chosen schema
    pub const fn with_schema(schema: Schema) -> Self {
        Self { schema }
    }

    /// The schema this codec speaks
    pub const fn schema(&self) -> Schema {
        self.schema
    }

    /// Encode one reading to a wire line (no trailing newline)
    ///
    /// Under [`Schema::LegacySpeed`] a missing speed encodes as `0.00`.
    pub fn encode(&self, reading: &TelemetryReading) -> Result<LineBuf, EncodeError> {
        let mut line = LineBuf::new();
        let d = LINE_DELIMITER;
        write!(
            line,
            "{:.2}{d}{:.2}{d}{:.2}{d}{:.6}{d}{:.6}{d}{:.2}{d}{:.2}{d}{:.2}{d}",
            reading.accel.x,
            reading.accel.y,
            reading.accel.z,
            reading.position.lat(),
            reading.position.lon(),
            reading.temperature,
            reading.pressure,
            reading.humidity,
        )
        .map_err(|_| EncodeError::LineTooLong)?;

        if self.schema == Schema::LegacySpeed {
            write!(line, "{:.2}{d}", reading.speed.unwrap_or(0.0))
                .map_err(|_| EncodeError::LineTooLong)?;
        }

        write!(line, "{:.2}{d}{}", reading.altitude, reading.phase)
            .map_err(|_| EncodeError::LineTooLong)?;

        Ok(line)
    }

    /// Decode one wire line
    ///
    /// Header rows yield [`Decoded::Header`]; anything else must match the
    /// active schema's arity exactly and parse numerically.
    pub fn decode(&self, line: &str) -> DecodeResult<Decoded> {
        let trimmed = line.trim();

        let mut fields = [""; 11];
        let mut found = 0usize;
        for part in trimmed.split(LINE_DELIMITER) {
            if found < fields.len() {
                fields[found] = part;
            }
            found += 1;
        }

        // Header check comes before the arity check: a header row from a
        // wider or narrower schema is still just a header.
        if found > 0 && fields[0].trim().eq_ignore_ascii_case(HEADER_TOKEN) {
            return Ok(Decoded::Header);
        }

        let expected = self.schema.field_count();
        if found != expected {
            return Err(DecodeError::WrongFieldCount { expected, found });
        }

        let accel = Vector3::new(
            parse_field(fields[0], "accel_x")?,
            parse_field(fields[1], "accel_y")?,
            parse_field(fields[2], "accel_z")?,
        );
        let position = GeoPoint::new(
            parse_field(fields[3], "lat")?,
            parse_field(fields[4], "lon")?,
        );
        let temperature = parse_field(fields[5], "temperature")?;
        let pressure = parse_field(fields[6], "pressure")?;
        let humidity = parse_field(fields[7], "humidity")?;

        let (speed, altitude, phase_field) = match self.schema {
            Schema::Canonical => (None, parse_field(fields[8], "altitude")?, fields[9]),
            Schema::LegacySpeed => (
                Some(parse_field(fields[8], "speed")?),
                parse_field(fields[9], "altitude")?,
                fields[10],
            ),
        };

        // An overlong phase is malformed, not silently chopped.
        let phase = PhaseToken::new(phase_field).ok_or(DecodeError::PhaseTooLong)?;

        let mut reading = TelemetryReading::new(
            accel,
            position,
            temperature,
            pressure,
            humidity,
            altitude,
            phase,
        );
        if let Some(speed) = speed {
            reading = reading.with_speed(speed);
        }

        Ok(Decoded::Reading(reading))
    }
}

fn parse_field(raw: &str, field: &'static str) -> DecodeResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| DecodeError::InvalidNumber { field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::FlightPhase;

    fn sample_reading() -> TelemetryReading {
        TelemetryReading::new(
            Vector3::new(0.12, -0.05, 9.81),
            GeoPoint::new(30.001234, 90.002345),
            24.5,
            1013.25,
            55.3,
            12.4,
            PhaseToken::from(FlightPhase::Ground),
        )
    }

    #[test]
    fn encode_canonical() {
        let codec = LineCodec::new();
        let line = codec.encode(&sample_reading()).unwrap();
        assert_eq!(
            line.as_str(),
            "0.12,-0.05,9.81,30.001234,90.002345,24.50,1013.25,55.30,12.40,GROUND"
        );
    }

    #[test]
    fn round_trip_at_declared_precision() {
        let codec = LineCodec::new();
        let original = sample_reading();
        let line = codec.encode(&original).unwrap();
        let decoded = codec.decode(&line).unwrap().into_reading().unwrap();

        assert!((decoded.accel.x - original.accel.x).abs() < 0.005);
        assert!((decoded.accel.z - original.accel.z).abs() < 0.005);
        assert!((decoded.position.lat() - original.position.lat()).abs() < 5e-7);
        assert!((decoded.position.lon() - original.position.lon()).abs() < 5e-7);
        assert!((decoded.temperature - original.temperature).abs() < 0.005);
        assert!((decoded.pressure - original.pressure).abs() < 0.005);
        assert!((decoded.humidity - original.humidity).abs() < 0.005);
        assert!((decoded.altitude - original.altitude).abs() < 0.005);
        assert_eq!(decoded.phase, original.phase);
    }

    #[test]
    fn header_row_skips_regardless_of_rest() {
        let codec = LineCodec::new();
        assert_eq!(
            codec
                .decode("accel_x,accel_y,accel_z,lat,lon,temperature,pressure,humidity,altitude,phase")
                .unwrap(),
            Decoded::Header
        );
        // Wrong arity and garbage fields still skip when the first field
        // is the header token
        assert_eq!(codec.decode("ACCEL_X,not,a,number").unwrap(), Decoded::Header);
        assert_eq!(codec.decode(" accel_x ").unwrap(), Decoded::Header);
    }

    #[test]
    fn arity_off_by_one_fails() {
        let codec = LineCodec::new();
        let nine = "0.1,0.2,9.8,30.0,90.0,24.0,1013.0,55.0,GROUND";
        let eleven = "0.1,0.2,9.8,30.0,90.0,24.0,1013.0,55.0,3.2,12.0,GROUND";

        assert_eq!(
            codec.decode(nine),
            Err(DecodeError::WrongFieldCount {
                expected: 10,
                found: 9
            })
        );
        assert_eq!(
            codec.decode(eleven),
            Err(DecodeError::WrongFieldCount {
                expected: 10,
                found: 11
            })
        );
    }

    #[test]
    fn non_numeric_field_fails() {
        let codec = LineCodec::new();
        let line = "0.1,0.2,abc,30.0,90.0,24.0,1013.0,55.0,12.0,GROUND";
        assert_eq!(
            codec.decode(line),
            Err(DecodeError::InvalidNumber { field: "accel_z" })
        );
    }

    #[test]
    fn legacy_schema_decodes_speed() {
        let codec = LineCodec::with_schema(Schema::LegacySpeed);
        let line = "0.1,0.2,9.8,30.0,90.0,24.0,1013.0,55.0,3.25,12.0,COASTING";
        let reading = codec.decode(line).unwrap().into_reading().unwrap();
        assert_eq!(reading.speed, Some(3.25));
        assert_eq!(reading.altitude, 12.0);
        assert_eq!(reading.phase.as_str(), "COASTING");

        // Canonical lines are the wrong arity for the legacy codec
        assert!(matches!(
            codec.decode("0.1,0.2,9.8,30.0,90.0,24.0,1013.0,55.0,12.0,GROUND"),
            Err(DecodeError::WrongFieldCount { expected: 11, found: 10 })
        ));
    }

    #[test]
    fn legacy_encode_emits_speed() {
        let codec = LineCodec::with_schema(Schema::LegacySpeed);
        let line = codec.encode(&sample_reading().with_speed(3.2)).unwrap();
        assert_eq!(
            line.as_str(),
            "0.12,-0.05,9.81,30.001234,90.002345,24.50,1013.25,55.30,3.20,12.40,GROUND"
        );
    }

    #[test]
    fn decode_normalizes_longitude_and_humidity() {
        let codec = LineCodec::new();
        let line = "0.1,0.2,9.8,30.0,190.0,24.0,1013.0,140.0,12.0,GROUND";
        let reading = codec.decode(line).unwrap().into_reading().unwrap();
        assert_eq!(reading.position.lon(), -170.0);
        assert_eq!(reading.humidity, 100.0);
    }

    #[test]
    fn phase_is_trimmed_and_uppercased() {
        let codec = LineCodec::new();
        let line = "0.1,0.2,9.8,30.0,90.0,24.0,1013.0,55.0,12.0, main deploy ";
        let reading = codec.decode(line).unwrap().into_reading().unwrap();
        assert_eq!(reading.phase.as_str(), "MAIN DEPLOY");
    }
}
