//! Property tests for the wire codec
//!
//! Exercises the codec over generated readings rather than hand-picked
//! samples: round-trips hold at the declared precision, and decoded
//! positions always satisfy the normalization invariants no matter what
//! the producer put on the wire.

use groundcast_core::{FlightPhase, GeoPoint, LineCodec, PhaseToken, TelemetryReading, Vector3};
use proptest::prelude::*;

fn phase_strategy() -> impl Strategy<Value = FlightPhase> {
    prop_oneof![
        Just(FlightPhase::Ground),
        Just(FlightPhase::Rising),
        Just(FlightPhase::Coasting),
        Just(FlightPhase::MainDeploy),
        Just(FlightPhase::SecondDeploy),
        Just(FlightPhase::Landed),
    ]
}

proptest! {
    #[test]
    fn round_trip_within_precision(
        ax in -100.0f64..100.0,
        ay in -100.0f64..100.0,
        az in -100.0f64..100.0,
        lat in -90.0f64..90.0,
        // Stay clear of the 180° seam: a longitude that rounds to exactly
        // 180.000000 on the wire wraps to -180 on decode
        lon in -180.0f64..179.999,
        temp in -60.0f64..60.0,
        pressure in 800.0f64..1100.0,
        humidity in 0.0f64..100.0,
        altitude in 0.0f64..5000.0,
        phase in phase_strategy(),
    ) {
        let codec = LineCodec::new();
        let reading = TelemetryReading::new(
            Vector3::new(ax, ay, az),
            GeoPoint::new(lat, lon),
            temp,
            pressure,
            humidity,
            altitude,
            PhaseToken::from(phase),
        );

        let line = codec.encode(&reading).unwrap();
        let decoded = codec.decode(&line).unwrap().into_reading().unwrap();

        prop_assert!((decoded.accel.x - reading.accel.x).abs() <= 0.005);
        prop_assert!((decoded.accel.y - reading.accel.y).abs() <= 0.005);
        prop_assert!((decoded.accel.z - reading.accel.z).abs() <= 0.005);
        prop_assert!((decoded.position.lat() - reading.position.lat()).abs() <= 5e-7);
        prop_assert!((decoded.position.lon() - reading.position.lon()).abs() <= 5e-7);
        prop_assert!((decoded.temperature - reading.temperature).abs() <= 0.005);
        prop_assert!((decoded.pressure - reading.pressure).abs() <= 0.005);
        prop_assert!((decoded.humidity - reading.humidity).abs() <= 0.005);
        prop_assert!((decoded.altitude - reading.altitude).abs() <= 0.005);
        prop_assert_eq!(decoded.phase, reading.phase);
    }

    #[test]
    fn decoded_positions_are_normalized(
        lat in -500.0f64..500.0,
        lon in -1000.0f64..1000.0,
    ) {
        let point = GeoPoint::new(lat, lon);
        prop_assert!((-90.0..=90.0).contains(&point.lat()));
        prop_assert!((-180.0..180.0).contains(&point.lon()));
    }
}
