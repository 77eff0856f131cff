//! Scratch storage owned by one segmentation run.
//!
//! Block buffers are sized once for the worst cut of an `n × n` matrix and
//! reused across the O(n²) candidate loop.

use crate::matrix::{segment_into, BlockLengths, BlockScratch, DistanceMatrix, SquareMatrix};

/// Paired block buffers for counts and distances.
#[derive(Debug, Clone)]
pub struct Workspace {
    dim: usize,
    counts: BlockScratch,
    distances: BlockScratch,
}

impl Workspace {
    /// Allocate scratch for matrices of dimension `n`.
    pub fn for_dimension(n: usize) -> Self {
        Self {
            dim: n,
            counts: BlockScratch::for_dimension(n),
            distances: BlockScratch::for_dimension(n),
        }
    }

    /// Dimension the buffers were sized for.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Cut the distance matrix at `(i, j)`.
    pub fn segment_distances(&mut self, distances: &DistanceMatrix, i: usize, j: usize) -> BlockLengths {
        debug_assert_eq!(distances.dim(), self.dim);
        segment_into(distances, i, j, &mut self.distances)
    }

    /// Cut one replicate at `(i, j)`.
    pub fn segment_counts<M: SquareMatrix + ?Sized>(&mut self, matrix: &M, i: usize, j: usize) -> BlockLengths {
        debug_assert_eq!(matrix.dim(), self.dim);
        segment_into(matrix, i, j, &mut self.counts)
    }

    /// Count blocks from the latest [`Workspace::segment_counts`].
    pub fn counts(&self) -> &BlockScratch {
        &self.counts
    }

    /// Distance blocks from the latest [`Workspace::segment_distances`].
    pub fn distances(&self) -> &BlockScratch {
        &self.distances
    }

    /// Values allocated across all buffers.
    pub fn footprint(&self) -> usize {
        self.counts.capacity() + self.distances.capacity()
    }
}
