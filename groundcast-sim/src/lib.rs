//! Synthetic flight data generator for Groundcast
//!
//! Stands in for a real telemetry source: a per-board flight state
//! machine synthesizes plausible readings over a GROUND → RISING →
//! COASTING → MAIN DEPLOY → SECOND DEPLOY → LANDED profile, and a
//! tick-loop feed delivers them as wire frames to an ingest pump feeding
//! the shared [`groundcast_core::BoardAggregator`].
//!
//! ```no_run
//! use std::sync::{mpsc, Arc};
//! use std::time::Duration;
//!
//! use groundcast_core::BoardAggregator;
//! use groundcast_sim::{spawn_feed, FlightProfile, FlightSimulator, IngestPump};
//!
//! let aggregator = Arc::new(BoardAggregator::new());
//! let (tx, rx) = mpsc::channel();
//!
//! let sim = FlightSimulator::new(6, FlightProfile::default());
//! let feed = spawn_feed(sim, Duration::from_millis(500), tx);
//!
//! let mut pump = IngestPump::new(Arc::clone(&aggregator));
//! pump.run(rx); // blocks until the feed stops
//! feed.stop();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod feed;
pub mod profile;
pub mod simulator;

pub use feed::{spawn_feed, FeedHandle, IngestPump, PumpStats, TelemetryFrame};
pub use profile::FlightProfile;
pub use simulator::FlightSimulator;
