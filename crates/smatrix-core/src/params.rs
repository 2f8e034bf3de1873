//! Walk parameters and validation.
//!
//! [`WalkParams`] is the input for constructing a simulation session.
//! [`validate()`](WalkParams::validate) checks every precondition the
//! step and statistics arithmetic relies on, so the engine itself never
//! has to fail at runtime.

use log::warn;

use crate::error::ConfigError;
use crate::lattice::Axis;

// ── Momentum ───────────────────────────────────────────────────────

/// Per-axis momentum of the particle.
///
/// Each component is a drift bias in `[-1, 1]`: `+1` always steps
/// forward, `-1` always steps backward, `0` is an unbiased lazy walk.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Momentum {
    /// Bias along the x axis.
    pub x: f32,
    /// Bias along the y axis.
    pub y: f32,
}

impl Momentum {
    /// Construct a momentum from its components.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component along `axis`.
    pub fn get(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Largest absolute component, floored at 0.2.
    ///
    /// Used to scale lag bins in the autocorrelation histogram so slow
    /// walks still get a usable window.
    pub fn lag_scale(self) -> f32 {
        self.x.abs().max(self.y.abs()).max(0.2)
    }
}

// ── TraceMode ──────────────────────────────────────────────────────

/// Whether the visit trace survives from one run to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TraceMode {
    /// Zero the trace at the start of every run.
    #[default]
    ResetEachRun,
    /// Keep accumulating across runs; only `initialize()` clears it.
    PersistAcrossRuns,
}

// ── WalkParams ─────────────────────────────────────────────────────

/// Complete configuration for a walk session.
#[derive(Clone, Debug, PartialEq)]
pub struct WalkParams {
    /// Number of lattice dimensions. Must be 2.
    pub dimensions: usize,
    /// Lattice extent along each axis. Default: 2000.
    pub size: u32,
    /// Half-width of the autocorrelation lag window. Default: 100.
    pub stat_window: usize,
    /// Declared particle count. Only particle 0 is simulated. Default: 1.
    pub particle_count: usize,
    /// Particle mass. Declared for completeness; the step rule ignores it.
    pub mass: f32,
    /// `1 - rate` of decay a renderer applies to the trace view. Default: 0.9.
    pub display_trace_decay: f32,
    /// Momentum applied at the start of every run. Default: (0.5, 0).
    pub initial_momentum: Momentum,
    /// Number of runs, resetting to the start between them. Default: 20.
    pub runs_count: usize,
    /// Steps taken per run. Default: 1000.
    pub steps_per_run: usize,
    /// RNG seed for deterministic walks.
    pub seed: u64,
    /// Trace retention between runs.
    pub trace_mode: TraceMode,
    /// Whether `run()` ends with the autocorrelation pass.
    pub compute_autocorrelation: bool,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            dimensions: 2,
            size: 2000,
            stat_window: 100,
            particle_count: 1,
            mass: 1.0,
            display_trace_decay: 0.9,
            initial_momentum: Momentum::new(0.5, 0.0),
            runs_count: 20,
            steps_per_run: 1000,
            seed: 0,
            trace_mode: TraceMode::ResetEachRun,
            compute_autocorrelation: true,
        }
    }
}

impl WalkParams {
    /// Largest accepted lattice size.
    ///
    /// A session holds two `f32` fields of `size * size` cells, so this
    /// caps each field at 256 MiB.
    pub const MAX_SIZE: u32 = 8192;

    /// Largest accepted log table, in rows.
    pub const MAX_LOG_ROWS: usize = 1 << 26;

    /// Largest accepted histogram half-width.
    ///
    /// `nt = 2 * max_lag + 1`, so the histogram holds at most
    /// `2 * 4097 * 4097` cells.
    pub const MAX_HISTOGRAM_LAG: usize = 2048;

    /// Single long run with a persistent trace and no statistics pass.
    pub fn single_run(size: u32, steps: usize) -> Self {
        Self {
            size,
            runs_count: 1,
            steps_per_run: steps,
            trace_mode: TraceMode::PersistAcrossRuns,
            compute_autocorrelation: false,
            ..Self::default()
        }
    }

    /// Set the lattice size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Set the initial momentum.
    pub fn with_momentum(mut self, x: f32, y: f32) -> Self {
        self.initial_momentum = Momentum::new(x, y);
        self
    }

    /// Set the run schedule.
    pub fn with_runs(mut self, runs_count: usize, steps_per_run: usize) -> Self {
        self.runs_count = runs_count;
        self.steps_per_run = steps_per_run;
        self
    }

    /// Set the autocorrelation half-window.
    pub fn with_stat_window(mut self, stat_window: usize) -> Self {
        self.stat_window = stat_window;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of rows the log table needs.
    ///
    /// Returns `None` on overflow; `validate()` rejects that case.
    pub fn log_rows(&self) -> Option<usize> {
        self.runs_count.checked_mul(self.steps_per_run)
    }

    /// Half-width of the autocorrelation histogram:
    /// `ceil(stat_window * initial_momentum.lag_scale())`.
    ///
    /// Saturates at `usize::MAX`; `validate()` rejects anything above
    /// [`MAX_HISTOGRAM_LAG`](Self::MAX_HISTOGRAM_LAG).
    pub fn histogram_max_lag(&self) -> usize {
        (self.stat_window as f32 * self.initial_momentum.lag_scale()).ceil() as usize
    }

    /// Validate all preconditions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimensions != 2 {
            return Err(ConfigError::UnsupportedDimensions {
                configured: self.dimensions,
            });
        }
        if self.size == 0 {
            return Err(ConfigError::EmptyLattice);
        }
        if self.size > Self::MAX_SIZE {
            return Err(ConfigError::LatticeTooLarge {
                size: self.size,
                max: Self::MAX_SIZE,
            });
        }
        if self.particle_count == 0 {
            return Err(ConfigError::NoParticles);
        }
        if self.particle_count > 1 {
            warn!(
                "particle_count is {}, but only particle 0 is simulated",
                self.particle_count
            );
        }
        // NaN fails the range check as well.
        for axis in Axis::ALL {
            let value = self.initial_momentum.get(axis);
            if !(-1.0..=1.0).contains(&value) {
                return Err(ConfigError::MomentumOutOfRange { axis, value });
            }
        }
        if !self.mass.is_finite() {
            return Err(ConfigError::NonFiniteMass { value: self.mass });
        }
        if !(0.0..=1.0).contains(&self.display_trace_decay) {
            return Err(ConfigError::InvalidTraceDecay {
                value: self.display_trace_decay,
            });
        }
        if self.log_rows().is_none_or(|rows| rows > Self::MAX_LOG_ROWS) {
            return Err(ConfigError::LogCapacityOverflow {
                runs: self.runs_count,
                steps: self.steps_per_run,
                max: Self::MAX_LOG_ROWS,
            });
        }
        let max_lag = self.histogram_max_lag();
        if max_lag > Self::MAX_HISTOGRAM_LAG {
            return Err(ConfigError::StatWindowTooLarge {
                stat_window: self.stat_window,
                max_lag,
                max: Self::MAX_HISTOGRAM_LAG,
            });
        }
        Ok(())
    }
}
