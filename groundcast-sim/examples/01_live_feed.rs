//! Live feed demo
//!
//! Runs the simulator for a handful of boards, pumps frames into a shared
//! aggregator and prints a status table once a second, including flight
//! scores once predictions are saved. Run with:
//!
//! ```bash
//! cargo run --example 01_live_feed
//! ```

use std::sync::{mpsc, Arc};
use std::time::Duration;

use groundcast_core::BoardAggregator;
use groundcast_sim::{spawn_feed, FlightProfile, FlightSimulator, IngestPump};

fn main() {
    let aggregator = Arc::new(BoardAggregator::new().with_display_names([
        ("0", "Rocket Alpha"),
        ("1", "Rocket Beta"),
        ("2", "Rocket Charlie"),
    ]));

    // Everyone predicts the nominal apogee up front
    for id in ["0", "1", "2"] {
        aggregator.save_prediction(id, 900.0);
    }

    let sim = FlightSimulator::new(3, FlightProfile::default());
    let (tx, rx) = mpsc::channel();
    let feed = spawn_feed(sim, Duration::from_millis(500), tx);

    let pump_aggregator = Arc::clone(&aggregator);
    let pump = std::thread::spawn(move || {
        let mut pump = IngestPump::new(pump_aggregator);
        pump.run(rx);
        pump.stats()
    });

    for _ in 0..75 {
        std::thread::sleep(Duration::from_secs(1));
        println!("{:-<78}", "");
        for id in aggregator.all_board_ids() {
            let Some(board) = aggregator.snapshot(&id) else {
                continue;
            };
            let phase = board
                .current_phase()
                .map(|p| p.as_str().to_owned())
                .unwrap_or_else(|| "waiting".to_owned());
            let score = match aggregator.score(&id) {
                Some(score) => format!("{:.1}", score.total()),
                None => "not available".to_owned(),
            };
            println!(
                "{:<14} {:<13} alt {:>7.1} m  max {:>7.1} m  main {}  second {}  score {}",
                board.display_name(),
                phase,
                board.current_altitude().unwrap_or(0.0),
                board.max_altitude().unwrap_or(0.0),
                if board.main_deployed() { "out" } else { "-" },
                if board.second_deployed() { "out" } else { "-" },
                score,
            );
        }
    }

    feed.stop();
    let stats = pump.join().expect("pump thread panicked");
    println!(
        "done: {} readings ingested, {} malformed",
        stats.readings, stats.malformed
    );
}
