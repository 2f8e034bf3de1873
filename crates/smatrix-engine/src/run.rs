//! Multi-run step loop.
//!
//! [`RunLoop`] repeats the step engine `steps_per_run` times for each of
//! `runs_count` runs, resetting the particle between runs and writing one
//! [`LogRow`] per step. The stop flag is polled after every step; when it
//! is set the whole loop ends, not just the current run.

use log::{debug, info, warn};
use smatrix_core::{LatticePos, TraceMode, WalkParams};

use crate::log_table::{LogRow, LogTable};
use crate::state::SimulationState;
use crate::step::StepEngine;
use crate::stop::StopHandle;
use crate::walk::DisplacementSampler;

// ── Observer ─────────────────────────────────────────────────────

/// Position readback published after each step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepFrame {
    /// Run index.
    pub run: usize,
    /// Steps taken in this run, including the one just executed.
    pub time: u64,
    /// Particle position after the step.
    pub position: LatticePos,
}

/// Read-only hook into the run loop.
///
/// Renderers implement this to redraw after each step. The state is
/// borrowed immutably; only the stop flag can influence the loop.
pub trait StepObserver {
    /// Called after every step, once its log row is written.
    fn on_step(&mut self, _frame: &StepFrame, _state: &SimulationState) {}

    /// Called when a run finishes all of its steps.
    fn on_run_complete(&mut self, _run: usize, _state: &SimulationState) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {}

// ── RunSummary ───────────────────────────────────────────────────

/// Outcome of one call to [`RunLoop::execute`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Runs that executed every step.
    pub runs_completed: usize,
    /// Total steps executed across all runs.
    pub steps_executed: u64,
    /// Whether the stop flag ended the loop early.
    pub stopped_early: bool,
}

// ── RunLoop ──────────────────────────────────────────────────────

/// Borrowed view of a session's pieces for the duration of a run.
pub struct RunLoop<'a, S> {
    params: &'a WalkParams,
    state: &'a mut SimulationState,
    engine: &'a mut StepEngine<S>,
    log: &'a mut LogTable,
    stop: &'a StopHandle,
}

impl<'a, S: DisplacementSampler> RunLoop<'a, S> {
    /// Assemble a loop over existing session state.
    pub fn new(
        params: &'a WalkParams,
        state: &'a mut SimulationState,
        engine: &'a mut StepEngine<S>,
        log: &'a mut LogTable,
        stop: &'a StopHandle,
    ) -> Self {
        Self {
            params,
            state,
            engine,
            log,
            stop,
        }
    }

    /// Run every configured run, or until the stop flag is set.
    pub fn execute(self, observer: &mut dyn StepObserver) -> RunSummary {
        let clear_trace = self.params.trace_mode == TraceMode::ResetEachRun;
        let mut summary = RunSummary::default();

        'runs: for run in 0..self.params.runs_count {
            self.state.reset_for_run(self.params.initial_momentum, clear_trace);
            self.state.set_run(run);

            for step in 0..self.params.steps_per_run {
                self.engine.step(self.state);
                summary.steps_executed += 1;

                let row = LogRow {
                    run,
                    time: step as u64,
                    pos_x: self.state.pos_x(),
                    pos_y: self.state.pos_y(),
                };
                let recorded = self.log.record(row);
                debug_assert!(recorded, "log table too small for run {run} step {step}");

                let frame = StepFrame {
                    run,
                    time: self.state.time(),
                    position: self.state.position(),
                };
                observer.on_step(&frame, self.state);

                if self.stop.is_requested() {
                    warn!("stop requested during run {run} at step {step}");
                    summary.stopped_early = true;
                    break 'runs;
                }
            }

            summary.runs_completed += 1;
            observer.on_run_complete(run, self.state);
            info!(
                "run {run} complete: {} steps, final position ({}, {})",
                self.params.steps_per_run,
                self.state.pos_x(),
                self.state.pos_y()
            );
        }

        debug!(
            "run loop finished: {} runs, {} steps, stopped_early={}",
            summary.runs_completed, summary.steps_executed, summary.stopped_early
        );
        summary
    }
}
