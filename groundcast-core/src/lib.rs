//! Telemetry core for Groundcast
//!
//! Handles the parts of a rocket ground station that have actual
//! invariants: the wire-line codec, the flight-phase model with sticky
//! deployment detection, per-board aggregation and flight scoring.
//! Transports (HTTP polling, push streams, serial lines) and rendering
//! layers live elsewhere; this crate only ever sees `(board_id, line)`
//! pairs on the way in and hands out consistent snapshots on the way out.
//!
//! The codec, phase model and scoring engine are `no_std`; the aggregator
//! needs `std` for its shared map and lock.
//!
//! ```
//! use groundcast_core::{BoardAggregator, LineCodec};
//!
//! let codec = LineCodec::new();
//! let boards = BoardAggregator::new();
//!
//! let line = "0.12,-0.05,9.81,30.001234,90.002345,24.50,1013.25,55.30,880.40,MAIN DEPLOY";
//! if let Some(reading) = codec.decode(line).unwrap().into_reading() {
//!     boards.ingest("0", reading, 31.5);
//! }
//!
//! let state = boards.snapshot("0").unwrap();
//! assert!(state.main_deployed());
//! assert_eq!(state.current_phase().unwrap().as_str(), "DESCENT");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod constants;
pub mod errors;
pub mod phase;
pub mod reading;
pub mod score;

#[cfg(feature = "std")]
pub mod aggregator;

// Public API
pub use codec::{Decoded, LineCodec, Schema};
pub use errors::{DecodeError, DecodeResult, EncodeError};
pub use phase::{classify_deploy_event, DeployEvent, FlightPhase, PhaseToken};
pub use reading::{GeoPoint, TelemetryReading, Vector3};
pub use score::FlightScore;

#[cfg(feature = "std")]
pub use aggregator::{BoardAggregator, BoardId, BoardState, TimedReading};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
