//! Tick-loop feed and ingest pump
//!
//! Replaces the thread-plus-global-dict wiring of the original dashboards
//! with an explicit channel: a producer thread ticks at a fixed interval,
//! encodes every board's next reading to a wire line and sends
//! `(board_id, line)` frames; an [`IngestPump`] on the consumer side
//! decodes frames and feeds a shared [`BoardAggregator`]. The pump is the
//! same component a real transport adapter would hand its lines to - the
//! aggregator never learns whether frames came from the simulator, an
//! HTTP poller or a serial port.
//!
//! Malformed lines are dropped, logged and counted; header rows are
//! counted but skipped silently.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use groundcast_core::{BoardAggregator, Decoded, LineCodec};

use crate::simulator::FlightSimulator;

/// One transport frame: a board id and its raw wire line
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryFrame {
    /// Board identifier assigned by the transport
    pub board_id: String,
    /// Raw CSV line, no trailing newline
    pub line: String,
}

/// Handle to a running feed thread
pub struct FeedHandle {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl FeedHandle {
    /// Ask the feed to stop and wait for it to finish
    pub fn stop(self) {
        self.stop.store(true, Ordering::Relaxed);
        let _ = self.handle.join();
    }
}

/// Spawn a producer thread ticking every `interval`
///
/// Each tick generates one frame per board and sends it down `tx`. The
/// thread exits when the receiver is dropped or [`FeedHandle::stop`] is
/// called.
pub fn spawn_feed(
    mut sim: FlightSimulator,
    interval: Duration,
    tx: Sender<TelemetryFrame>,
) -> FeedHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);

    let handle = std::thread::spawn(move || {
        let start = Instant::now();
        let mut tick = 0u64;

        log::info!("feed started for {} boards", sim.board_count());

        'ticking: while !stop_flag.load(Ordering::Relaxed) {
            let elapsed = start.elapsed().as_secs_f64();

            for board in 0..sim.board_count() {
                let line = match sim.generate_line(board, elapsed) {
                    Ok(line) => line,
                    Err(err) => {
                        log::warn!("board {board}: encode failed: {err}");
                        continue;
                    }
                };
                let frame = TelemetryFrame {
                    board_id: board.to_string(),
                    line: line.as_str().to_owned(),
                };
                if tx.send(frame).is_err() {
                    // Receiver gone; nothing left to feed
                    break 'ticking;
                }
            }

            if tick % 10 == 0 {
                log::debug!("tick {tick} at t={elapsed:.1}s");
            }
            tick += 1;
            std::thread::sleep(interval);
        }

        log::info!("feed stopped after {tick} ticks");
    });

    FeedHandle { stop, handle }
}

/// Counters for operator visibility into the ingest path
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PumpStats {
    /// Frames received
    pub frames: u64,
    /// Readings successfully decoded and ingested
    pub readings: u64,
    /// Header rows skipped (expected, silent)
    pub headers_skipped: u64,
    /// Malformed lines dropped (logged)
    pub malformed: u64,
}

/// Decodes frames and feeds the shared aggregator
pub struct IngestPump {
    codec: LineCodec,
    aggregator: Arc<BoardAggregator>,
    stats: PumpStats,
    epoch: Instant,
}

impl IngestPump {
    /// Pump for the canonical wire schema
    pub fn new(aggregator: Arc<BoardAggregator>) -> Self {
        Self::with_codec(aggregator, LineCodec::new())
    }

    /// Pump with an explicit codec (e.g. the legacy speed schema)
    pub fn with_codec(aggregator: Arc<BoardAggregator>, codec: LineCodec) -> Self {
        Self {
            codec,
            aggregator,
            stats: PumpStats::default(),
            epoch: Instant::now(),
        }
    }

    /// Counters so far
    pub fn stats(&self) -> PumpStats {
        self.stats
    }

    /// Decode and ingest one frame
    pub fn handle_frame(&mut self, frame: &TelemetryFrame) {
        self.stats.frames += 1;
        match self.codec.decode(&frame.line) {
            Ok(Decoded::Reading(reading)) => {
                let timestamp = self.epoch.elapsed().as_secs_f64();
                self.aggregator.ingest(&frame.board_id, reading, timestamp);
                self.stats.readings += 1;
            }
            Ok(Decoded::Header) => {
                self.stats.headers_skipped += 1;
            }
            Err(err) => {
                self.stats.malformed += 1;
                log::warn!(
                    "board {}: dropping line ({err}): {:?}",
                    frame.board_id,
                    frame.line
                );
            }
        }
    }

    /// Consume frames until the channel closes
    pub fn run(&mut self, rx: Receiver<TelemetryFrame>) {
        for frame in rx.iter() {
            self.handle_frame(&frame);
        }
        log::info!(
            "pump finished: {} readings, {} headers, {} malformed",
            self.stats.readings,
            self.stats.headers_skipped,
            self.stats.malformed
        );
    }
}
