//! Single-tick advance of the walk.

use smatrix_core::{Axis, LatticePos};

use crate::state::SimulationState;
use crate::walk::DisplacementSampler;

/// Advances a [`SimulationState`] one tick at a time.
///
/// Owns the displacement sampler so the draw sequence is tied to the
/// session, not to any particular state value.
#[derive(Clone, Debug)]
pub struct StepEngine<S> {
    sampler: S,
}

impl<S: DisplacementSampler> StepEngine<S> {
    /// Wrap a sampler.
    pub fn new(sampler: S) -> Self {
        Self { sampler }
    }

    /// Reseed the underlying sampler.
    pub fn reseed(&mut self, seed: u64) {
        self.sampler.reseed(seed);
    }

    /// Execute one step.
    ///
    /// Draws x then y, clears the old occupancy cell, wraps the
    /// position on the torus, marks the new cell in occupancy and
    /// trace, and advances the clock. Never fails.
    pub fn step(&mut self, state: &mut SimulationState) {
        let momentum = state.momentum();
        let dx = self.sampler.draw(Axis::X, momentum.x);
        let dy = self.sampler.draw(Axis::Y, momentum.y);

        let next: LatticePos = state.position().wrapped_add(dx, dy, state.size());
        state.move_to(next);
        state.finish_step();
    }

    /// Borrow the sampler.
    pub fn sampler(&self) -> &S {
        &self.sampler
    }
}
