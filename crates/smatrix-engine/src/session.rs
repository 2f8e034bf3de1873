//! User-facing simulation session.
//!
//! [`Session`] is the one object a presentation layer talks to. It owns
//! the parameters, the simulation state, the step engine, the trajectory
//! log, and the last autocorrelation histogram. Everything the caller can
//! do to it goes through `initialize`, `step`, `run`, and the stop flag;
//! everything it can see goes through read-only accessors.
//!
//! # Ownership model
//!
//! All mutating methods take `&mut self`. To keep a UI responsive while a
//! long run executes, move the session onto a background thread with
//! [`SessionThread`](crate::background::SessionThread) and talk to it
//! through its [`StopHandle`], its channels, and its field snapshot slot.

use smatrix_core::{ConfigError, Field2D, LatticePos, WalkParams};

use crate::autocorr::AutocorrHistogram;
use crate::log_table::LogTable;
use crate::run::{NoopObserver, RunLoop, RunSummary, StepObserver};
use crate::state::SimulationState;
use crate::step::StepEngine;
use crate::stop::StopHandle;
use crate::walk::{DisplacementSampler, MomentumWalk};

/// An explicitly owned walk simulation.
///
/// # Example
///
/// ```
/// use smatrix_core::WalkParams;
/// use smatrix_engine::Session;
///
/// let params = WalkParams::default()
///     .with_size(64)
///     .with_runs(2, 200)
///     .with_stat_window(10)
///     .with_seed(1);
/// let mut session = Session::new(params).unwrap();
/// let summary = session.run();
/// assert_eq!(summary.runs_completed, 2);
/// assert!(session.histogram().is_some());
/// ```
pub struct Session<S = MomentumWalk> {
    params: WalkParams,
    state: SimulationState,
    engine: StepEngine<S>,
    log: LogTable,
    histogram: Option<AutocorrHistogram>,
    last_run: Option<RunSummary>,
    stop: StopHandle,
}

impl Session<MomentumWalk> {
    /// Validate `params` and build an initialized session with the
    /// default ChaCha8-backed walk.
    pub fn new(params: WalkParams) -> Result<Self, ConfigError> {
        let sampler = MomentumWalk::seeded(params.seed);
        Self::with_sampler(params, sampler)
    }
}

impl<S: DisplacementSampler> Session<S> {
    /// Validate `params` and build an initialized session drawing
    /// displacements from `sampler`.
    pub fn with_sampler(params: WalkParams, sampler: S) -> Result<Self, ConfigError> {
        params.validate()?;
        let mut session = Self {
            state: SimulationState::new(params.size, params.initial_momentum),
            engine: StepEngine::new(sampler),
            log: LogTable::default(),
            histogram: None,
            last_run: None,
            stop: StopHandle::new(),
            params,
        };
        session.initialize();
        Ok(session)
    }

    /// Replace the parameters and re-initialize.
    ///
    /// On error the session keeps its previous parameters and state.
    pub fn configure(&mut self, params: WalkParams) -> Result<(), ConfigError> {
        params.validate()?;
        self.state = SimulationState::new(params.size, params.initial_momentum);
        self.params = params;
        self.initialize();
        Ok(())
    }

    /// Reset the particle, clear both fields, reseed the walk, and
    /// allocate a zeroed log table of `runs_count * steps_per_run` rows.
    pub fn initialize(&mut self) {
        self.state.reset_for_run(self.params.initial_momentum, true);
        self.state.set_run(0);
        self.engine.reseed(self.params.seed);
        self.log = LogTable::new(self.params.runs_count, self.params.steps_per_run);
        self.histogram = None;
        self.last_run = None;
    }

    /// Advance one step without logging.
    pub fn step(&mut self) {
        self.engine.step(&mut self.state);
    }

    /// Run all configured runs, then the autocorrelation pass if enabled.
    ///
    /// Clears any earlier stop request first.
    pub fn run(&mut self) -> RunSummary {
        self.run_with_observer(&mut NoopObserver)
    }

    /// Like [`run`](Self::run), reporting every step to `observer`.
    pub fn run_with_observer(&mut self, observer: &mut dyn StepObserver) -> RunSummary {
        self.stop.clear();
        self.execute(observer)
    }

    /// Run without touching the stop flag.
    pub(crate) fn execute(&mut self, observer: &mut dyn StepObserver) -> RunSummary {
        let summary = RunLoop::new(
            &self.params,
            &mut self.state,
            &mut self.engine,
            &mut self.log,
            &self.stop,
        )
        .execute(observer);
        self.last_run = Some(summary);

        if self.params.compute_autocorrelation {
            self.histogram = Some(AutocorrHistogram::compute(
                &self.log,
                &self.params,
                summary.runs_completed,
                &self.stop,
            ));
        }
        summary
    }

    /// Recompute the histogram over the runs completed by the last
    /// `run()`, regardless of `compute_autocorrelation`.
    pub fn compute_autocorrelation(&mut self) -> &AutocorrHistogram {
        let runs = self.last_run.map_or(0, |s| s.runs_completed);
        self.histogram
            .insert(AutocorrHistogram::compute(&self.log, &self.params, runs, &self.stop))
    }

    /// Ask a running loop to stop at the next step boundary.
    pub fn request_stop(&self) {
        self.stop.request();
    }

    /// Clonable handle to the stop flag, for other threads.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Active parameters.
    pub fn params(&self) -> &WalkParams {
        &self.params
    }

    /// Full simulation state.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Occupancy field: a single 1 at the particle's cell.
    pub fn occupancy(&self) -> &Field2D {
        self.state.occupancy()
    }

    /// Visit-count trace field.
    pub fn trace(&self) -> &Field2D {
        self.state.trace()
    }

    /// Current particle position.
    pub fn position(&self) -> LatticePos {
        self.state.position()
    }

    /// Steps taken in the current run.
    pub fn time(&self) -> u64 {
        self.state.time()
    }

    /// Index of the current run.
    pub fn run_index(&self) -> usize {
        self.state.run()
    }

    /// Histogram from the most recent autocorrelation pass.
    pub fn histogram(&self) -> Option<&AutocorrHistogram> {
        self.histogram.as_ref()
    }

    /// Trajectory log.
    pub fn log_table(&self) -> &LogTable {
        &self.log
    }

    /// The displacement sampler driving the walk.
    pub fn sampler(&self) -> &S {
        self.engine.sampler()
    }

    /// Summary of the most recent `run()`.
    pub fn last_run(&self) -> Option<RunSummary> {
        self.last_run
    }
}

impl<S> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("size", &self.params.size)
            .field("run", &self.state.run())
            .field("time", &self.state.time())
            .field("position", &self.state.position())
            .field("log_rows", &self.log.len())
            .field("has_histogram", &self.histogram.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smatrix_core::TraceMode;

    fn small() -> WalkParams {
        WalkParams::default()
            .with_size(12)
            .with_runs(3, 40)
            .with_stat_window(4)
            .with_seed(5)
    }

    #[test]
    fn new_rejects_invalid_params() {
        match Session::new(small().with_momentum(2.0, 0.0)) {
            Err(ConfigError::MomentumOutOfRange { .. }) => {}
            other => panic!("expected MomentumOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn new_rejects_unbounded_stat_window() {
        let p = WalkParams::default()
            .with_size(4)
            .with_runs(1, 10)
            .with_stat_window(usize::MAX)
            .with_momentum(1.0, 0.0);
        match Session::new(p) {
            Err(ConfigError::StatWindowTooLarge { .. }) => {}
            other => panic!("expected StatWindowTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn widest_accepted_window_runs() {
        let p = WalkParams::default()
            .with_size(4)
            .with_runs(1, 10)
            .with_stat_window(WalkParams::MAX_HISTOGRAM_LAG)
            .with_momentum(1.0, 0.0);
        let mut s = Session::new(p).unwrap();
        s.run();
        let h = s.histogram().unwrap();
        assert_eq!(h.max_lag(), WalkParams::MAX_HISTOGRAM_LAG);
        assert_eq!(h.total(), 0.0);
    }

    #[test]
    fn new_rejects_lattice_past_cell_budget() {
        match Session::new(small().with_size(1_000_000).with_runs(1, 1)) {
            Err(ConfigError::LatticeTooLarge { .. }) => {}
            other => panic!("expected LatticeTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn initialize_sizes_log_and_centers_particle() {
        let s = Session::new(small()).unwrap();
        assert_eq!(s.log_table().len(), 120);
        assert_eq!(s.position(), LatticePos::new(6, 6));
        assert_eq!(s.time(), 0);
        assert_eq!(s.run_index(), 0);
        assert!(s.histogram().is_none());
    }

    #[test]
    fn manual_step_does_not_log() {
        let mut s = Session::new(small()).unwrap();
        s.step();
        s.step();
        assert_eq!(s.time(), 2);
        assert_eq!(s.trace().sum(), 2.0);
        assert!(s
            .log_table()
            .rows()
            .iter()
            .all(|r| (r.pos_x, r.pos_y) == (0, 0)));
    }

    #[test]
    fn same_seed_same_trajectory() {
        let mut a = Session::new(small()).unwrap();
        let mut b = Session::new(small()).unwrap();
        a.run();
        b.run();
        assert_eq!(a.log_table(), b.log_table());
        assert_eq!(a.histogram(), b.histogram());
    }

    #[test]
    fn initialize_replays_the_walk() {
        let mut s = Session::new(small()).unwrap();
        s.run();
        let first = s.log_table().clone();
        s.initialize();
        s.run();
        assert_eq!(s.log_table(), &first);
    }

    #[test]
    fn configure_resizes_lattice() {
        let mut s = Session::new(small()).unwrap();
        s.configure(small().with_size(20).with_runs(1, 5)).unwrap();
        assert_eq!(s.occupancy().size(), 20);
        assert_eq!(s.position(), LatticePos::new(10, 10));
        assert_eq!(s.log_table().len(), 5);
    }

    #[test]
    fn failed_configure_keeps_previous_params() {
        let mut s = Session::new(small()).unwrap();
        assert!(s.configure(small().with_size(0)).is_err());
        assert_eq!(s.params().size, 12);
    }

    #[test]
    fn stats_skipped_when_disabled() {
        let mut p = small();
        p.compute_autocorrelation = false;
        let mut s = Session::new(p).unwrap();
        s.run();
        assert!(s.histogram().is_none());
        let h = s.compute_autocorrelation();
        assert_eq!(h.runs_scanned(), 3);
    }

    #[test]
    fn autocorrelation_is_idempotent() {
        let mut s = Session::new(small()).unwrap();
        s.run();
        let first = s.histogram().cloned().unwrap();
        let second = s.compute_autocorrelation().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn persistent_trace_mode_counts_every_step() {
        let mut p = small();
        p.trace_mode = TraceMode::PersistAcrossRuns;
        let mut s = Session::new(p).unwrap();
        s.run();
        assert_eq!(s.trace().sum(), 120.0);
    }

    #[test]
    fn stale_stop_request_is_cleared_by_run() {
        let mut s = Session::new(small()).unwrap();
        s.request_stop();
        let summary = s.run();
        assert!(!summary.stopped_early);
        assert_eq!(summary.runs_completed, 3);
    }
}
