//! Headless walk example.
//!
//! Demonstrates: build params → Session → run on a background thread →
//! drain run events → join → read the autocorrelation histogram.
//!
//! Run with `RUST_LOG=info` to see the engine's own progress lines.

use std::error::Error;

use smatrix_core::{Axis, WalkParams};
use smatrix_engine::{BackgroundConfig, RunEvent, Session, SessionThread};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    println!("=== SolidMatrix Headless Walk ===\n");

    let params = WalkParams::default()
        .with_size(200)
        .with_runs(8, 2000)
        .with_stat_window(40)
        .with_momentum(0.5, 0.0)
        .with_seed(42);
    let session = Session::new(params)?;
    let thread = SessionThread::spawn(session, BackgroundConfig::default())?;

    for event in thread.events() {
        match event {
            RunEvent::RunComplete { run } => {
                let visited = thread
                    .latest_fields()
                    .map_or(0, |f| f.trace.nonzero_cells().len());
                println!("  run {run} complete, {visited} cells visited");
            }
            RunEvent::Finished {
                summary,
                dropped_frames,
            } => {
                println!(
                    "\nfinished: {} runs, {} steps, stopped_early={}, dropped_frames={}",
                    summary.runs_completed,
                    summary.steps_executed,
                    summary.stopped_early,
                    dropped_frames
                );
                break;
            }
        }
    }

    let session = thread.join()?;
    let pos = session.position();
    println!("final position: ({}, {})", pos.x, pos.y);
    println!("trace total: {}", session.trace().sum());

    if let Some(h) = session.histogram() {
        let [_, nt, _] = h.shape();
        println!(
            "histogram: {nt}x{nt} per axis, peak {}, display max {:.1}",
            h.peak(),
            h.display_max()
        );
        let zero = h.max_lag();
        for axis in Axis::ALL {
            let diagonal: Vec<f32> = (0..nt)
                .filter_map(|lag| h.get(axis, lag, lag))
                .collect();
            let at_zero: f32 = (0..nt).filter_map(|lag| h.get(axis, zero, lag)).sum();
            println!(
                "  {axis}: diagonal sum {:.0}, zero-delta sum {at_zero:.0}",
                diagonal.iter().sum::<f32>()
            );
        }
    }

    Ok(())
}
