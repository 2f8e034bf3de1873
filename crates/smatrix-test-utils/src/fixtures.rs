//! Reusable parameter and log fixtures.
//!
//! - [`small_params`]: a fast multi-run configuration with statistics on.
//! - [`stationary_params`]: zero momentum, for samplers that never move.
//! - [`log_from_paths`]: build a [`LogTable`] from explicit trajectories.

use smatrix_core::{Momentum, WalkParams};
use smatrix_engine::{LogRow, LogTable};

/// 16x16 lattice, 4 runs of 50 steps, window 5, seed 11.
pub fn small_params() -> WalkParams {
    WalkParams::default()
        .with_size(16)
        .with_runs(4, 50)
        .with_stat_window(5)
        .with_seed(11)
}

/// Zero momentum with the given lattice, window, and schedule.
pub fn stationary_params(size: u32, stat_window: usize, runs: usize, steps: usize) -> WalkParams {
    WalkParams {
        initial_momentum: Momentum::new(0.0, 0.0),
        ..WalkParams::default()
            .with_size(size)
            .with_runs(runs, steps)
            .with_stat_window(stat_window)
    }
}

/// One run per path; every path must have the same length.
///
/// # Panics
///
/// Panics if the paths differ in length.
pub fn log_from_paths(paths: &[Vec<(i32, i32)>]) -> LogTable {
    let steps = paths.first().map_or(0, Vec::len);
    let mut log = LogTable::new(paths.len(), steps);
    for (run, path) in paths.iter().enumerate() {
        assert_eq!(path.len(), steps, "path {run} has a different length");
        for (t, &(x, y)) in path.iter().enumerate() {
            log.record(LogRow {
                run,
                time: t as u64,
                pos_x: x,
                pos_y: y,
            });
        }
    }
    log
}
