//! Square matrices consumed by the segmentation core.
//!
//! Contact matrices and the derived distance matrix share one column-major
//! layout so that [`segment_into`] can copy whole column runs instead of
//! gathering element by element.

mod contact;
mod distance;
mod segment;

pub use contact::{ContactMatrices, ContactMatrix, MatrixError};
pub use distance::DistanceMatrix;
pub use segment::{segment_into, BlockLengths, BlockScratch, Region};

/// Read access to an `n × n` matrix stored column by column.
pub trait SquareMatrix {
    /// Dimension `n`.
    fn dim(&self) -> usize;

    /// Column `col` as a contiguous slice of `n` values (rows `0..n`).
    fn column(&self, col: usize) -> &[f64];

    /// Value at `(row, col)`.
    fn get(&self, row: usize, col: usize) -> f64 {
        self.column(col)[row]
    }
}
