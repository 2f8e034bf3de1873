//! Benchmark profiles for SolidMatrix walks.
//!
//! - [`reference_profile`]: the default 2000x2000 lattice, 20 runs of 1000 steps
//! - [`stress_window_profile`]: a wide statistics window over long runs
//! - [`recorded_session`]: a session that has already run, for timing the
//!   autocorrelation pass on its own

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use smatrix_core::{ConfigError, WalkParams};
use smatrix_engine::Session;

/// Default parameters with a fixed seed.
pub fn reference_profile(seed: u64) -> WalkParams {
    WalkParams::default().with_seed(seed)
}

/// 4 runs of 20K steps with a 400-step window and x momentum 0.8.
///
/// max_lag = 320, so each plane has 641x641 bins.
pub fn stress_window_profile(seed: u64) -> WalkParams {
    WalkParams::default()
        .with_size(512)
        .with_runs(4, 20_000)
        .with_stat_window(400)
        .with_momentum(0.8, 0.0)
        .with_seed(seed)
}

/// Run `params` to completion with the autocorrelation pass switched off.
pub fn recorded_session(mut params: WalkParams) -> Result<Session, ConfigError> {
    params.compute_autocorrelation = false;
    let mut session = Session::new(params)?;
    session.run();
    Ok(session)
}
