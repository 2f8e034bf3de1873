//! Toroidal lattice coordinates.
//!
//! The walk lives on a `size x size` torus: moving past one edge
//! re-enters at the opposite edge. Coordinates are stored as `i32`
//! so displacements can be applied without sign juggling.

use std::fmt;

/// One of the two simulated lattice axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis (field column).
    X,
    /// Vertical axis (field row).
    Y,
}

impl Axis {
    /// Both axes in draw order.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Index of this axis in `[x, y]` layouts.
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

/// Integer lattice position of a particle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LatticePos {
    /// Column coordinate.
    pub x: i32,
    /// Row coordinate.
    pub y: i32,
}

impl LatticePos {
    /// Construct a position from its components.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Center cell of a `size x size` lattice (integer division).
    pub fn center(size: u32) -> Self {
        let c = (size / 2) as i32;
        Self { x: c, y: c }
    }

    /// Component along `axis`.
    pub fn get(self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Apply `(dx, dy)` with wraparound on a `size x size` torus.
    pub fn wrapped_add(self, dx: i32, dy: i32, size: u32) -> Self {
        Self {
            x: periodic_position(self.x, dx, size),
            y: periodic_position(self.y, dy, size),
        }
    }
}

/// Apply `displacement` to `position` on a periodic axis of length `size`.
///
/// The result is always in `[0, size)`, including for negative inputs.
/// `size` must be at least 1 and no larger than `i32::MAX`; parameter
/// validation guarantees both before the engine calls this.
pub fn periodic_position(position: i32, displacement: i32, size: u32) -> i32 {
    let n = i64::from(size);
    (i64::from(position) + i64::from(displacement)).rem_euclid(n) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn wraps_past_upper_edge() {
        assert_eq!(periodic_position(9, 1, 10), 0);
    }

    #[test]
    fn wraps_past_lower_edge() {
        assert_eq!(periodic_position(0, -1, 10), 9);
    }

    #[test]
    fn interior_moves_are_plain_addition() {
        assert_eq!(periodic_position(4, 1, 10), 5);
        assert_eq!(periodic_position(4, -1, 10), 3);
        assert_eq!(periodic_position(4, 0, 10), 4);
    }

    #[test]
    fn single_cell_lattice_is_a_fixed_point() {
        for d in -1..=1 {
            assert_eq!(periodic_position(0, d, 1), 0);
        }
    }

    #[test]
    fn center_uses_integer_division() {
        assert_eq!(LatticePos::center(10), LatticePos::new(5, 5));
        assert_eq!(LatticePos::center(7), LatticePos::new(3, 3));
        assert_eq!(LatticePos::center(1), LatticePos::new(0, 0));
    }

    #[test]
    fn wrapped_add_handles_corner() {
        let p = LatticePos::new(0, 9).wrapped_add(-1, 1, 10);
        assert_eq!(p, LatticePos::new(9, 0));
    }

    #[test]
    fn axis_accessors_agree() {
        let p = LatticePos::new(3, 8);
        assert_eq!(p.get(Axis::X), 3);
        assert_eq!(p.get(Axis::Y), 8);
        assert_eq!(Axis::X.index(), 0);
        assert_eq!(Axis::Y.index(), 1);
    }

    proptest! {
        #[test]
        fn result_always_in_range(
            p in -10_000i32..10_000,
            d in -1i32..=1,
            size in 1u32..500,
        ) {
            let r = periodic_position(p, d, size);
            prop_assert!(r >= 0);
            prop_assert!((r as u32) < size);
        }

        #[test]
        fn inverse_displacement_round_trips(
            p in -10_000i32..10_000,
            d in -1i32..=1,
            size in 1u32..500,
        ) {
            let there = periodic_position(p, d, size);
            let back = periodic_position(there, -d, size);
            prop_assert_eq!(back, p.rem_euclid(size as i32));
        }
    }
}
