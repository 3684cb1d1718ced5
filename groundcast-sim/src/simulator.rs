//! Synthetic Flight State Machine
//!
//! ## Overview
//!
//! Produces physically-plausible-looking telemetry for a configurable
//! number of boards. Phase progression is deterministic in elapsed time
//! (per board, offset by a random launch stagger); sensor values carry
//! uniform noise on top of closed-form altitude/temperature/pressure
//! curves per phase.
//!
//! ## Timeline
//!
//! Per board, with `flight_time = elapsed - launch_offset`:
//!
//! ```text
//! flight_time        phase           altitude model
//! ─────────────────  ──────────────  ─────────────────────────────────
//! < 0                GROUND          base ± 1 m noise
//! [0, 10)            RISING          base + 5·t²
//! [10, 30)           COASTING        base + 500 + 25·t' − 0.3·t'²
//! [30, 35)           MAIN DEPLOY     apogee − 2·t'²   (apogee = base + 880)
//! ≥ 35, not landed   MAIN DEPLOY →   max(base, apogee − 50 − 3·t'²);
//!                    SECOND DEPLOY   one-shot switch at alt ≤ 150 m
//! landed             LANDED          base + small noise, indefinitely
//! ```
//!
//! Landing is declared once the modeled altitude returns within 10 m of
//! the board's base altitude after more than 10 s of descent. The deploy
//! triggers and the landed flag are one-shot: repeated calls inside the
//! same phase are idempotent.
//!
//! ## Contract
//!
//! [`FlightSimulator::generate`] must be called with non-decreasing
//! elapsed time per board; landing detection compares against the
//! previous modeled altitude, so time running backwards produces
//! non-physical output.

use groundcast_core::codec::LineBuf;
use groundcast_core::{
    EncodeError, FlightPhase, GeoPoint, LineCodec, PhaseToken, TelemetryReading, Vector3,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::profile::FlightProfile;

/// Per-board synthetic physics state
#[derive(Debug, Clone)]
struct BoardSim {
    lat: f64,
    lon: f64,
    base_altitude: f64,
    base_temperature: f64,
    base_pressure: f64,
    base_humidity: f64,
    launch_offset: f64,
    main_deploy_triggered: bool,
    second_deploy_triggered: bool,
    max_altitude_reached: f64,
    has_launched: bool,
    has_landed: bool,
    launch_time: Option<f64>,
    landing_time: Option<f64>,
    prev_altitude: Option<f64>,
    prev_time: Option<f64>,
}

/// Multi-board flight data generator
pub struct FlightSimulator {
    profile: FlightProfile,
    boards: Vec<BoardSim>,
    rng: SmallRng,
    codec: LineCodec,
}

impl FlightSimulator {
    /// Simulator with an entropy-seeded RNG
    pub fn new(num_boards: usize, profile: FlightProfile) -> Self {
        Self::build(num_boards, profile, SmallRng::from_entropy())
    }

    /// Simulator with a fixed seed, for reproducible timelines
    pub fn with_seed(num_boards: usize, profile: FlightProfile, seed: u64) -> Self {
        Self::build(num_boards, profile, SmallRng::seed_from_u64(seed))
    }

    fn build(num_boards: usize, profile: FlightProfile, mut rng: SmallRng) -> Self {
        let jitter = profile.site_jitter_deg;
        let boards = (0..num_boards)
            .map(|_| BoardSim {
                lat: profile.site_lat + sample(&mut rng, -jitter, jitter),
                lon: profile.site_lon + sample(&mut rng, -jitter, jitter),
                base_altitude: sample_range(&mut rng, profile.base_altitude),
                base_temperature: sample_range(&mut rng, profile.temperature),
                base_pressure: sample_range(&mut rng, profile.pressure),
                base_humidity: sample_range(&mut rng, profile.humidity),
                launch_offset: sample(&mut rng, 0.0, profile.launch_stagger_s),
                main_deploy_triggered: false,
                second_deploy_triggered: false,
                max_altitude_reached: 0.0,
                has_launched: false,
                has_landed: false,
                launch_time: None,
                landing_time: None,
                prev_altitude: None,
                prev_time: None,
            })
            .collect();

        Self {
            profile,
            boards,
            rng,
            codec: LineCodec::new(),
        }
    }

    /// Number of simulated boards
    pub fn board_count(&self) -> usize {
        self.boards.len()
    }

    /// Highest altitude the board's deploy window has recorded so far
    pub fn peak_altitude(&self, board: usize) -> f64 {
        self.boards[board].max_altitude_reached
    }

    /// Generate the next reading for one board
    ///
    /// `elapsed` is wall-clock seconds since the simulation started and
    /// must be non-decreasing per board. Panics if `board` is out of
    /// range.
    pub fn generate(&mut self, board: usize, elapsed: f64) -> TelemetryReading {
        let rng = &mut self.rng;
        let state = &mut self.boards[board];

        if state.prev_altitude.is_none() {
            state.prev_altitude = Some(state.base_altitude);
            state.prev_time = Some(elapsed);
        }

        let flight_time = elapsed - state.launch_offset;
        let apogee = state.base_altitude + 880.0;

        let (phase, altitude, temp_change, pressure_change);
        if flight_time < 0.0 {
            phase = FlightPhase::Ground;
            altitude = state.base_altitude + sample(rng, -1.0, 1.0);
            temp_change = sample(rng, -0.5, 0.5);
            pressure_change = sample(rng, -2.0, 2.0);
        } else if state.has_landed {
            phase = FlightPhase::Landed;
            let since_landing = elapsed - state.landing_time.unwrap_or(elapsed);
            altitude = state.base_altitude + sample(rng, 0.0, 2.0);
            temp_change = sample(rng, -0.3, 0.3) + since_landing * 0.05;
            pressure_change = sample(rng, -1.0, 1.0);
        } else if flight_time < 10.0 {
            if !state.has_launched {
                state.has_launched = true;
                state.launch_time = Some(elapsed);
            }
            phase = FlightPhase::Rising;
            altitude = state.base_altitude + flight_time * flight_time * 5.0;
            temp_change = -flight_time * 0.5;
            pressure_change = -flight_time * 2.0;
        } else if flight_time < 30.0 {
            phase = FlightPhase::Coasting;
            let t = flight_time - 10.0;
            altitude = state.base_altitude + 500.0 + t * 25.0 - t * t * 0.3;
            temp_change = -10.0 - t * 0.3;
            pressure_change = -30.0 - t * 1.5;
        } else if flight_time < 35.0 {
            phase = FlightPhase::MainDeploy;
            state.main_deploy_triggered = true;

            let t = flight_time - 30.0;
            altitude = apogee - t * t * 2.0;
            temp_change = -16.0;
            pressure_change = -60.0;

            if altitude > state.max_altitude_reached {
                state.max_altitude_reached = altitude;
            }
        } else {
            let t = flight_time - 35.0;
            altitude = (apogee - 50.0 - t * t * 3.0).max(state.base_altitude);
            temp_change = -16.0 + t * 0.2;
            pressure_change = -60.0 + t * 1.2;

            // One-shot switch to the second chute below 150 m
            if altitude <= 150.0 {
                state.second_deploy_triggered = true;
            }
            phase = if state.second_deploy_triggered {
                FlightPhase::SecondDeploy
            } else {
                FlightPhase::MainDeploy
            };

            if altitude <= state.base_altitude + 10.0 && t > 10.0 {
                state.has_landed = true;
                state.landing_time = Some(elapsed);
            }
        }

        // GPS random-walks only while in the air
        if phase != FlightPhase::Ground && phase != FlightPhase::Landed {
            let drift = self.profile.drift_deg;
            let walked = GeoPoint::new(
                state.lat + sample(rng, -drift, drift),
                state.lon + sample(rng, -drift, drift),
            );
            state.lat = walked.lat();
            state.lon = walked.lon();
        }

        state.prev_altitude = Some(altitude);
        state.prev_time = Some(elapsed);

        let accel = match phase {
            FlightPhase::Rising => Vector3::new(
                sample(rng, -20.0, 20.0),
                sample(rng, -20.0, 20.0),
                sample(rng, 50.0, 100.0),
            ),
            FlightPhase::Coasting => Vector3::new(
                sample(rng, -10.0, 10.0),
                sample(rng, -10.0, 10.0),
                sample(rng, 0.0, 30.0),
            ),
            FlightPhase::MainDeploy => Vector3::new(
                sample(rng, -15.0, 15.0),
                sample(rng, -15.0, 15.0),
                sample(rng, -50.0, -10.0),
            ),
            FlightPhase::SecondDeploy => Vector3::new(
                sample(rng, -8.0, 8.0),
                sample(rng, -8.0, 8.0),
                sample(rng, -20.0, -5.0),
            ),
            FlightPhase::Landed => Vector3::new(
                sample(rng, -0.5, 0.5),
                sample(rng, -0.5, 0.5),
                sample(rng, 9.5, 10.5),
            ),
            // Ground and any phase the machine never emits
            _ => Vector3::new(
                sample(rng, -1.0, 1.0),
                sample(rng, -1.0, 1.0),
                sample(rng, 9.0, 11.0),
            ),
        };

        TelemetryReading::new(
            accel,
            GeoPoint::new(state.lat, state.lon),
            state.base_temperature + temp_change + sample(rng, -0.5, 0.5),
            state.base_pressure + pressure_change + sample(rng, -1.0, 1.0),
            state.base_humidity + sample(rng, -2.0, 2.0),
            altitude + sample(rng, -5.0, 5.0),
            PhaseToken::from(phase),
        )
    }

    /// Generate the next reading for one board, encoded as a wire line
    pub fn generate_line(&mut self, board: usize, elapsed: f64) -> Result<LineBuf, EncodeError> {
        let reading = self.generate(board, elapsed);
        self.codec.encode(&reading)
    }
}

/// Uniform draw that tolerates an empty range
fn sample(rng: &mut SmallRng, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

fn sample_range(rng: &mut SmallRng, range: (f64, f64)) -> f64 {
    sample(rng, range.0, range.1)
}
