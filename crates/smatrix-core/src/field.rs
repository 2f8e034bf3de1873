//! Dense square `f32` fields.
//!
//! Both the occupancy and the trace are stored as a [`Field2D`]: a
//! row-major `size x size` buffer where rows follow the y axis and
//! columns follow the x axis.

use crate::lattice::LatticePos;

/// A row-major `size x size` grid of `f32` values.
#[derive(Clone, Debug, PartialEq)]
pub struct Field2D {
    size: u32,
    data: Vec<f32>,
}

impl Field2D {
    /// Allocate a zero-filled field.
    pub fn zeros(size: u32) -> Self {
        let n = (size as usize) * (size as usize);
        Self {
            size,
            data: vec![0.0; n],
        }
    }

    /// Extent along each axis.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.data.len()
    }

    /// Flat row-major index of `pos`, or `None` if `pos` is off-lattice.
    pub fn index_of(&self, pos: LatticePos) -> Option<usize> {
        let n = self.size as i32;
        if pos.x < 0 || pos.x >= n || pos.y < 0 || pos.y >= n {
            return None;
        }
        Some((pos.y as usize) * (self.size as usize) + (pos.x as usize))
    }

    /// Value at `pos`, or `None` if `pos` is off-lattice.
    pub fn get(&self, pos: LatticePos) -> Option<f32> {
        self.index_of(pos).map(|i| self.data[i])
    }

    /// Overwrite the value at `pos`. Off-lattice writes are ignored.
    pub fn set(&mut self, pos: LatticePos, value: f32) {
        if let Some(i) = self.index_of(pos) {
            self.data[i] = value;
        }
    }

    /// Add `delta` to the value at `pos`. Off-lattice writes are ignored.
    pub fn add(&mut self, pos: LatticePos, delta: f32) {
        if let Some(i) = self.index_of(pos) {
            self.data[i] += delta;
        }
    }

    /// Reset every cell to zero.
    pub fn fill_zero(&mut self) {
        self.data.fill(0.0);
    }

    /// Sum of all cells.
    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&v| f64::from(v)).sum()
    }

    /// Positions of every cell whose value is non-zero, in row-major order.
    pub fn nonzero_cells(&self) -> Vec<LatticePos> {
        let n = self.size as usize;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0.0)
            .map(|(i, _)| LatticePos::new((i % n) as i32, (i / n) as i32))
            .collect()
    }

    /// Raw row-major storage, for renderers.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_has_square_cell_count() {
        let f = Field2D::zeros(4);
        assert_eq!(f.cell_count(), 16);
        assert_eq!(f.sum(), 0.0);
    }

    #[test]
    fn rows_follow_y_axis() {
        let mut f = Field2D::zeros(3);
        f.set(LatticePos::new(2, 1), 1.0);
        assert_eq!(f.as_slice()[3 + 2], 1.0);
        assert_eq!(f.index_of(LatticePos::new(2, 1)), Some(5));
    }

    #[test]
    fn off_lattice_access_is_ignored() {
        let mut f = Field2D::zeros(3);
        f.set(LatticePos::new(3, 0), 1.0);
        f.add(LatticePos::new(-1, 0), 1.0);
        assert_eq!(f.get(LatticePos::new(3, 0)), None);
        assert_eq!(f.sum(), 0.0);
    }

    #[test]
    fn nonzero_cells_reports_positions() {
        let mut f = Field2D::zeros(5);
        f.add(LatticePos::new(4, 0), 2.0);
        f.add(LatticePos::new(1, 3), 1.0);
        assert_eq!(
            f.nonzero_cells(),
            vec![LatticePos::new(4, 0), LatticePos::new(1, 3)]
        );
        f.fill_zero();
        assert!(f.nonzero_cells().is_empty());
    }
}
