//! Board Aggregation
//!
//! ## Overview
//!
//! The aggregator is the single shared state of a ground station: a map
//! from board id to accumulated [`BoardState`], fed by whatever transport
//! delivers decoded readings and read by any number of display or query
//! consumers. It replaces the module-level dictionaries the original
//! dashboards mutated from background threads - one object, constructed
//! at process start, passed by `Arc` to producers and readers alike.
//!
//! ## Concurrency model
//!
//! A single mutex guards the whole aggregator. `ingest` performs a
//! read-then-write (the sticky deploy-flag check) that must be atomic with
//! respect to concurrent ingests, and a snapshot must never observe a
//! board whose flags and latest history entry disagree. One lock over the
//! whole state is sufficient and keeps the invariants trivially true; at
//! a handful of boards sampling at 2 Hz there is no contention worth
//! sharding for.
//!
//! ## Sticky deploy flags
//!
//! Once a reading's phase classifies as a main or second deploy event the
//! corresponding flag latches `true` for the lifetime of the board, even
//! if later readings report earlier phases (radio replays, resets of the
//! board's own state machine). The raw phase token is retained on every
//! history entry; the display phase is derived, never stored in its place.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::constants::DEFAULT_HISTORY_CAP;
use crate::phase::{display_phase, DeployEvent, PhaseToken};
use crate::reading::{GeoPoint, TelemetryReading};
use crate::score::{planar_distance_m, score_flight, FlightScore};

/// Board identifier as assigned by the transport
pub type BoardId = String;

/// One history entry: a reading and the ground-side time it arrived
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedReading {
    /// Seconds since the aggregator's epoch (producer-defined)
    pub timestamp: f64,
    /// The decoded reading
    pub reading: TelemetryReading,
}

/// Accumulated state for one board
///
/// Obtained from [`BoardAggregator::snapshot`]; a snapshot is a clone and
/// internally consistent (its deploy flags match its latest entry).
#[derive(Debug, Clone)]
pub struct BoardState {
    history: VecDeque<TimedReading>,
    main_deployed: bool,
    second_deployed: bool,
    display_name: String,
    last_seen: f64,
}

impl BoardState {
    fn new(display_name: String) -> Self {
        Self {
            history: VecDeque::new(),
            main_deployed: false,
            second_deployed: false,
            display_name,
            last_seen: 0.0,
        }
    }

    /// Time-ordered history, oldest first
    pub fn history(&self) -> impl Iterator<Item = &TimedReading> {
        self.history.iter()
    }

    /// Number of stored readings
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// True when no reading has been stored
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Whether a main-deploy event has ever been observed (sticky)
    pub fn main_deployed(&self) -> bool {
        self.main_deployed
    }

    /// Whether a second-deploy event has ever been observed (sticky)
    pub fn second_deployed(&self) -> bool {
        self.second_deployed
    }

    /// Operator-facing board name
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Ground-side timestamp of the latest reading
    pub fn last_seen(&self) -> f64 {
        self.last_seen
    }

    /// Latest raw phase token, as received
    pub fn raw_phase(&self) -> Option<PhaseToken> {
        self.history.back().map(|entry| entry.reading.phase)
    }

    /// Latest display phase (deploy phases shown as `DESCENT`)
    pub fn current_phase(&self) -> Option<PhaseToken> {
        self.raw_phase().map(|raw| display_phase(&raw))
    }

    /// Latest altitude in meters
    pub fn current_altitude(&self) -> Option<f64> {
        self.history.back().map(|entry| entry.reading.altitude)
    }

    /// Maximum altitude ever observed
    pub fn max_altitude(&self) -> Option<f64> {
        self.history
            .iter()
            .map(|entry| entry.reading.altitude)
            .fold(None, |acc, alt| match acc {
                Some(best) if best >= alt => Some(best),
                _ => Some(alt),
            })
    }

    /// First recorded position (the launch point)
    pub fn first_position(&self) -> Option<GeoPoint> {
        self.history.front().map(|entry| entry.reading.position)
    }

    /// Most recent recorded position
    pub fn last_position(&self) -> Option<GeoPoint> {
        self.history.back().map(|entry| entry.reading.position)
    }

    /// Planar displacement from the launch point, meters
    ///
    /// `None` until two positions have been recorded.
    pub fn displacement_m(&self) -> Option<f64> {
        if self.history.len() < 2 {
            return None;
        }
        let first = self.first_position()?;
        let last = self.last_position()?;
        Some(planar_distance_m(first, last))
    }
}

/// Thread-safe accumulator of per-board telemetry
///
/// ```
/// use groundcast_core::aggregator::BoardAggregator;
/// use groundcast_core::codec::LineCodec;
///
/// let aggregator = BoardAggregator::new();
/// let codec = LineCodec::new();
///
/// let line = "0.12,-0.05,9.81,30.001234,90.002345,24.50,1013.25,55.30,12.40,GROUND";
/// if let Some(reading) = codec.decode(line).unwrap().into_reading() {
///     aggregator.ingest("0", reading, 0.5);
/// }
///
/// let board = aggregator.snapshot("0").unwrap();
/// assert_eq!(board.len(), 1);
/// assert_eq!(board.display_name(), "Board 0");
/// ```
pub struct BoardAggregator {
    inner: Mutex<Inner>,
    history_cap: usize,
}

struct Inner {
    boards: HashMap<BoardId, BoardState>,
    predictions: HashMap<BoardId, f64>,
    names: HashMap<BoardId, String>,
}

impl Default for BoardAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardAggregator {
    /// Aggregator with the default history cap
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                boards: HashMap::new(),
                predictions: HashMap::new(),
                names: HashMap::new(),
            }),
            history_cap: DEFAULT_HISTORY_CAP,
        }
    }

    /// Override the per-board history cap
    pub fn with_history_cap(mut self, cap: usize) -> Self {
        self.history_cap = cap.max(1);
        self
    }

    /// Provide operator-facing names for known board ids
    ///
    /// Unmapped boards fall back to `"Board {id}"`.
    pub fn with_display_names<I, K, V>(self, names: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<BoardId>,
        V: Into<String>,
    {
        {
            let mut inner = self.lock();
            for (id, name) in names {
                inner.names.insert(id.into(), name.into());
            }
        }
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock still holds the last consistent state
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Ingest one decoded reading for a board
    ///
    /// Creates the board on first sight, latches deploy flags from the
    /// reading's phase, appends to history (dropping the oldest entry past
    /// the cap) and updates `last_seen`. Atomic under the aggregator lock.
    ///
    /// History keeps ingest order; producers are expected to call in
    /// non-decreasing timestamp order, the aggregator does not sort.
    pub fn ingest(&self, board_id: &str, reading: TelemetryReading, timestamp: f64) {
        let mut inner = self.lock();

        if !inner.boards.contains_key(board_id) {
            let name = inner
                .names
                .get(board_id)
                .cloned()
                .unwrap_or_else(|| format!("Board {board_id}"));
            #[cfg(feature = "log")]
            log::debug!("tracking new board {board_id} ({name})");
            inner.boards.insert(board_id.to_owned(), BoardState::new(name));
        }
        let Some(board) = inner.boards.get_mut(board_id) else {
            return;
        };

        match reading.phase.deploy_event() {
            Some(DeployEvent::Main) => board.main_deployed = true,
            Some(DeployEvent::Second) => board.second_deployed = true,
            None => {}
        }

        board.history.push_back(TimedReading { timestamp, reading });
        while board.history.len() > self.history_cap {
            board.history.pop_front();
        }
        board.last_seen = timestamp;
    }

    /// Consistent snapshot of one board; `None` means "no data yet"
    pub fn snapshot(&self, board_id: &str) -> Option<BoardState> {
        self.lock().boards.get(board_id).cloned()
    }

    /// All board ids seen so far, sorted for stable iteration
    pub fn all_board_ids(&self) -> Vec<BoardId> {
        let inner = self.lock();
        let mut ids: Vec<BoardId> = inner.boards.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of boards seen so far
    pub fn board_count(&self) -> usize {
        self.lock().boards.len()
    }

    /// Save (or overwrite) the predicted apogee for a board
    ///
    /// No validation here; the scoring path rejects non-positive and
    /// non-finite predictions by reporting the score as unavailable.
    pub fn save_prediction(&self, board_id: &str, predicted_apogee: f64) {
        self.lock()
            .predictions
            .insert(board_id.to_owned(), predicted_apogee);
    }

    /// Stored predicted apogee for a board, if any
    pub fn prediction(&self, board_id: &str) -> Option<f64> {
        self.lock().predictions.get(board_id).copied()
    }

    /// Score a board's flight against its stored prediction
    ///
    /// `None` ("not available", distinct from a zero score) when the board
    /// is unknown, has no prediction, the prediction is invalid, or fewer
    /// than two positions exist.
    pub fn score(&self, board_id: &str) -> Option<FlightScore> {
        let inner = self.lock();
        let board = inner.boards.get(board_id)?;
        let predicted = *inner.predictions.get(board_id)?;
        if board.history.len() < 2 {
            return None;
        }
        let max_altitude = board.max_altitude()?;
        let launch = board.first_position()?;
        let last = board.last_position()?;
        score_flight(max_altitude, predicted, launch, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::FlightPhase;
    use crate::reading::Vector3;
    use std::sync::Arc;

    fn reading(phase: &str, altitude: f64, lat: f64, lon: f64) -> TelemetryReading {
        TelemetryReading::new(
            Vector3::new(0.0, 0.0, 9.8),
            GeoPoint::new(lat, lon),
            22.0,
            1013.0,
            50.0,
            altitude,
            PhaseToken::new(phase).unwrap(),
        )
    }

    #[test]
    fn unknown_board_is_empty_not_error() {
        let aggregator = BoardAggregator::new();
        assert!(aggregator.snapshot("7").is_none());
        assert!(aggregator.score("7").is_none());
        assert!(aggregator.all_board_ids().is_empty());
    }

    #[test]
    fn deploy_flags_are_sticky() {
        let aggregator = BoardAggregator::new();
        let phases = ["RISING", "MAIN DEPLOY", "COASTING", "GROUND"];
        for (i, phase) in phases.iter().enumerate() {
            aggregator.ingest("0", reading(phase, 100.0, 30.0, 90.0), i as f64);
            let board = aggregator.snapshot("0").unwrap();
            // Latched from the second ingest onwards
            assert_eq!(board.main_deployed(), i >= 1, "after phase {phase}");
            assert!(!board.second_deployed());
        }
    }

    #[test]
    fn display_phase_remaps_but_raw_is_kept() {
        let aggregator = BoardAggregator::new();
        aggregator.ingest("0", reading("MAIN DEPLOY", 800.0, 30.0, 90.0), 1.0);

        let board = aggregator.snapshot("0").unwrap();
        assert!(board.main_deployed());
        assert_eq!(board.current_phase().unwrap().as_str(), "DESCENT");
        assert_eq!(board.raw_phase().unwrap().as_str(), "MAIN DEPLOY");
    }

    #[test]
    fn history_cap_drops_oldest() {
        let aggregator = BoardAggregator::new().with_history_cap(3);
        for i in 0..5 {
            aggregator.ingest("0", reading("RISING", i as f64, 30.0, 90.0), i as f64);
        }
        let board = aggregator.snapshot("0").unwrap();
        assert_eq!(board.len(), 3);
        let altitudes: Vec<f64> = board.history().map(|e| e.reading.altitude).collect();
        assert_eq!(altitudes, vec![2.0, 3.0, 4.0]);
        assert_eq!(board.last_seen(), 4.0);
    }

    #[test]
    fn display_names_fall_back_to_board_id() {
        let aggregator =
            BoardAggregator::new().with_display_names([("0", "Rocket Alpha")]);
        aggregator.ingest("0", reading("GROUND", 10.0, 30.0, 90.0), 0.0);
        aggregator.ingest("3", reading("GROUND", 10.0, 30.0, 90.0), 0.0);

        assert_eq!(aggregator.snapshot("0").unwrap().display_name(), "Rocket Alpha");
        assert_eq!(aggregator.snapshot("3").unwrap().display_name(), "Board 3");
    }

    #[test]
    fn prediction_overwrites() {
        let aggregator = BoardAggregator::new();
        assert_eq!(aggregator.prediction("0"), None);
        aggregator.save_prediction("0", 1200.0);
        aggregator.save_prediction("0", 900.0);
        assert_eq!(aggregator.prediction("0"), Some(900.0));
    }

    #[test]
    fn score_requires_prediction_and_two_positions() {
        let aggregator = BoardAggregator::new();
        aggregator.ingest("0", reading("RISING", 500.0, 30.0, 90.0), 0.0);
        // One sample, no prediction
        assert!(aggregator.score("0").is_none());

        aggregator.save_prediction("0", 1000.0);
        // Still only one position
        assert!(aggregator.score("0").is_none());

        aggregator.ingest("0", reading("LANDED", 0.0, 30.0, 90.0), 60.0);
        let score = aggregator.score("0").unwrap();
        // Landed where it launched: full distance component
        assert_eq!(score.distance, 7.5);
        // max altitude 500 vs predicted 1000 → ratio -0.5 → 12.0
        assert!((score.apogee - 12.0).abs() < 1e-12);
    }

    #[test]
    fn max_altitude_is_peak_not_latest() {
        let aggregator = BoardAggregator::new();
        for (t, alt) in [(0.0, 10.0), (1.0, 880.0), (2.0, 200.0)] {
            aggregator.ingest("0", reading("COASTING", alt, 30.0, 90.0), t);
        }
        let board = aggregator.snapshot("0").unwrap();
        assert_eq!(board.max_altitude(), Some(880.0));
        assert_eq!(board.current_altitude(), Some(200.0));
    }

    #[test]
    fn concurrent_ingest_and_snapshot() {
        let aggregator = Arc::new(BoardAggregator::new());
        let writer = {
            let aggregator = Arc::clone(&aggregator);
            std::thread::spawn(move || {
                for i in 0..500 {
                    let phase = if i % 2 == 0 { "RISING" } else { "MAIN DEPLOY" };
                    aggregator.ingest("0", reading(phase, i as f64, 30.0, 90.0), i as f64);
                    aggregator.ingest("1", reading("GROUND", 5.0, 30.0, 90.0), i as f64);
                }
            })
        };

        // Readers must only ever see flags consistent with history
        for _ in 0..200 {
            if let Some(board) = aggregator.snapshot("0") {
                if board.main_deployed() {
                    assert!(board
                        .history()
                        .any(|e| e.reading.phase.deploy_event().is_some()));
                }
            }
        }
        writer.join().unwrap();

        assert_eq!(aggregator.all_board_ids(), vec!["0".to_owned(), "1".to_owned()]);
        assert_eq!(aggregator.snapshot("0").unwrap().len(), 500);
    }
}
