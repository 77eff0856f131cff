//! Bin-distance matrix shared by every fit.

use super::SquareMatrix;

/// Distance to the main diagonal: entry `(row, col)` is `|row - col|`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Build the distance matrix for `n` bins.
    pub fn new(n: usize) -> Self {
        let mut values = Vec::with_capacity(n * n);
        for col in 0..n {
            values.extend((0..n).map(|row| row.abs_diff(col) as f64));
        }
        Self { dim: n, values }
    }
}

impl SquareMatrix for DistanceMatrix {
    fn dim(&self) -> usize {
        self.dim
    }

    fn column(&self, col: usize) -> &[f64] {
        &self.values[col * self.dim..(col + 1) * self.dim]
    }
}
