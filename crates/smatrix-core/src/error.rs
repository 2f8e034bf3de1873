//! Error types for walk configuration.
//!
//! The walk itself is total over well-formed inputs, so the only error
//! surface is a malformed [`WalkParams`](crate::WalkParams), rejected once
//! when a session is configured.

use std::error::Error;
use std::fmt;

use crate::lattice::Axis;

/// Errors detected during [`WalkParams::validate()`](crate::WalkParams::validate).
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Only two-dimensional lattices are simulated.
    UnsupportedDimensions {
        /// The configured dimension count.
        configured: usize,
    },
    /// Lattice size is zero.
    EmptyLattice,
    /// Lattice fields would exceed the per-field cell budget.
    LatticeTooLarge {
        /// The configured size.
        size: u32,
        /// Largest accepted size.
        max: u32,
    },
    /// `particle_count` is zero; particle 0 must exist.
    NoParticles,
    /// A momentum component is NaN or outside `[-1, 1]`.
    MomentumOutOfRange {
        /// The offending axis.
        axis: Axis,
        /// The offending value.
        value: f32,
    },
    /// Particle mass is NaN or infinite.
    NonFiniteMass {
        /// The invalid value.
        value: f32,
    },
    /// Display trace decay is NaN or outside `[0, 1]`.
    InvalidTraceDecay {
        /// The invalid value.
        value: f32,
    },
    /// `runs_count * steps_per_run` overflows or exceeds the row budget.
    LogCapacityOverflow {
        /// Configured number of runs.
        runs: usize,
        /// Configured steps per run.
        steps: usize,
        /// Largest accepted row count.
        max: usize,
    },
    /// The autocorrelation histogram implied by `stat_window` is too wide.
    StatWindowTooLarge {
        /// Configured half-window.
        stat_window: usize,
        /// Resulting histogram half-width (saturated).
        max_lag: usize,
        /// Largest accepted half-width.
        max: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedDimensions { configured } => {
                write!(f, "only 2 dimensions are supported, got {configured}")
            }
            Self::EmptyLattice => write!(f, "lattice size must be at least 1"),
            Self::LatticeTooLarge { size, max } => {
                write!(f, "lattice size {size} exceeds maximum of {max}")
            }
            Self::NoParticles => write!(f, "particle_count must be at least 1"),
            Self::MomentumOutOfRange { axis, value } => {
                write!(f, "momentum {axis} must be in [-1, 1], got {value}")
            }
            Self::NonFiniteMass { value } => write!(f, "mass must be finite, got {value}"),
            Self::InvalidTraceDecay { value } => {
                write!(f, "display_trace_decay must be in [0, 1], got {value}")
            }
            Self::LogCapacityOverflow { runs, steps, max } => {
                write!(f, "log table of {runs} runs x {steps} steps exceeds {max} rows")
            }
            Self::StatWindowTooLarge {
                stat_window,
                max_lag,
                max,
            } => write!(
                f,
                "stat_window {stat_window} gives histogram half-width {max_lag}, maximum is {max}"
            ),
        }
    }
}

impl Error for ConfigError {}
