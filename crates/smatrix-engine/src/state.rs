//! Mutable simulation state for the single walking particle.

use smatrix_core::{Field2D, LatticePos, Momentum};

/// Occupancy, trace, and counters for one session.
///
/// Owned by the session and mutated only by the step engine and the
/// run loop. Renderers read it through the accessors.
#[derive(Clone, Debug)]
pub struct SimulationState {
    size: u32,
    occupancy: Field2D,
    trace: Field2D,
    position: LatticePos,
    momentum: Momentum,
    time: u64,
    run: usize,
    /// Position as last published for logging.
    readback: LatticePos,
}

impl SimulationState {
    /// Allocate state for a `size x size` lattice with the particle at
    /// the center.
    pub fn new(size: u32, momentum: Momentum) -> Self {
        let mut state = Self {
            size,
            occupancy: Field2D::zeros(size),
            trace: Field2D::zeros(size),
            position: LatticePos::center(size),
            momentum,
            time: 0,
            run: 0,
            readback: LatticePos::center(size),
        };
        state.reset_for_run(momentum, true);
        state
    }

    /// Return the particle to the center and restart the run clock.
    ///
    /// The starting cell is marked occupied but not counted in the
    /// trace. `clear_trace` selects whether visit counts survive.
    pub fn reset_for_run(&mut self, momentum: Momentum, clear_trace: bool) {
        self.occupancy.fill_zero();
        if clear_trace {
            self.trace.fill_zero();
        }
        self.position = LatticePos::center(self.size);
        self.occupancy.set(self.position, 1.0);
        self.momentum = momentum;
        self.time = 0;
        self.readback = self.position;
    }

    pub(crate) fn set_run(&mut self, run: usize) {
        self.run = run;
    }

    /// Move the particle, updating occupancy and trace.
    pub(crate) fn move_to(&mut self, next: LatticePos) {
        self.occupancy.set(self.position, 0.0);
        self.position = next;
        self.occupancy.set(next, 1.0);
        self.trace.add(next, 1.0);
    }

    /// Advance the clock and publish the position readback.
    pub(crate) fn finish_step(&mut self) {
        self.time += 1;
        self.readback = self.position;
    }

    /// Lattice extent.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Field with a single 1 at the particle's cell.
    pub fn occupancy(&self) -> &Field2D {
        &self.occupancy
    }

    /// Per-cell visit counts.
    pub fn trace(&self) -> &Field2D {
        &self.trace
    }

    /// Current particle position.
    pub fn position(&self) -> LatticePos {
        self.position
    }

    /// Current momentum.
    pub fn momentum(&self) -> Momentum {
        self.momentum
    }

    /// Steps taken in the current run.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Index of the current run.
    pub fn run(&self) -> usize {
        self.run
    }

    /// Readback x coordinate, as written to the log.
    pub fn pos_x(&self) -> i32 {
        self.readback.x
    }

    /// Readback y coordinate, as written to the log.
    pub fn pos_y(&self) -> i32 {
        self.readback.y
    }
}
