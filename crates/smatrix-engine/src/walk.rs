//! Momentum-biased lazy random walk.
//!
//! Each axis takes a ternary step `{+1, 0, -1}` per tick. With momentum
//! `m`, the step probabilities are
//!
//! ```text
//! e      = 0.5 * (1 + m^2)
//! p_plus = 0.5 * (e + m)
//! p_zero = 1 - e
//! p_minus= 0.5 * (e - m)
//! ```
//!
//! which sum to one for every `m` and give drift `m`. The variance is
//! largest at `m = 0`, where the walk steps +1/0/-1 with 1/4, 1/2, 1/4.
//!
//! Draws go through the [`DisplacementSampler`] trait so tests can feed
//! scripted displacement sequences. The production sampler is
//! [`MomentumWalk`], which uses a seeded ChaCha8 RNG.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use smatrix_core::Axis;

/// Step probabilities for one momentum component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WalkProbabilities {
    /// Probability of stepping `+1`.
    pub plus: f32,
    /// Probability of staying put.
    pub zero: f32,
    /// Probability of stepping `-1`.
    pub minus: f32,
}

impl WalkProbabilities {
    /// Probabilities for momentum `m`. Valid for `m` in `[-1, 1]`.
    pub fn for_momentum(m: f32) -> Self {
        let e = 0.5 * (1.0 + m * m);
        Self {
            plus: 0.5 * (e + m),
            zero: 1.0 - e,
            minus: 0.5 * (e - m),
        }
    }

    /// Map a uniform draw `r` in `[0, 1)` to a displacement.
    pub fn displacement(&self, r: f32) -> i32 {
        if r < self.plus {
            1
        } else if r < self.plus + self.zero {
            0
        } else {
            -1
        }
    }
}

/// Source of per-axis displacements.
///
/// `draw` is called once per axis per step, x first, then y.
pub trait DisplacementSampler {
    /// Draw a displacement in `{-1, 0, 1}` for `axis` given its momentum.
    fn draw(&mut self, axis: Axis, momentum: f32) -> i32;

    /// Reseed the sampler. Called when a session is (re)initialized.
    fn reseed(&mut self, _seed: u64) {}
}

/// Random walk sampler backed by a seedable RNG.
#[derive(Clone, Debug)]
pub struct MomentumWalk<R = ChaCha8Rng> {
    rng: R,
}

impl<R: SeedableRng> MomentumWalk<R> {
    /// Create a sampler with a deterministic seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: R::seed_from_u64(seed),
        }
    }
}

impl<R> MomentumWalk<R> {
    /// Wrap an existing RNG.
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore + SeedableRng> DisplacementSampler for MomentumWalk<R> {
    fn draw(&mut self, _axis: Axis, momentum: f32) -> i32 {
        let r: f32 = self.rng.random();
        WalkProbabilities::for_momentum(momentum).displacement(r)
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = R::seed_from_u64(seed);
    }
}
