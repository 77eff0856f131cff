//! Cutting a matrix into the three comparison blocks of a segment `[i, j]`.
//!
//! For every column `col` in `[i, j]` the blocks take:
//! - top: rows `[0, i)`
//! - triangular: rows `[i, col)` (strict upper triangle)
//! - bottom: rows `(j, n)`
//!
//! Rows `[col, j]` belong to none of them, so no entry is read twice.

use std::fmt;

use super::SquareMatrix;

/// One of the three blocks defined by a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Region {
    /// Rows above the segment.
    Top,
    /// Strict upper triangle of the segment itself.
    Triangular,
    /// Rows below the segment.
    Bottom,
}

impl Region {
    /// All regions in storage order.
    pub const ALL: [Region; 3] = [Region::Top, Region::Triangular, Region::Bottom];

    pub(crate) fn index(self) -> usize {
        match self {
            Region::Top => 0,
            Region::Triangular => 1,
            Region::Bottom => 2,
        }
    }

    /// Lower-case name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Top => "top",
            Region::Triangular => "triangular",
            Region::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of values each block holds for a given cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockLengths {
    /// `i * (j - i + 1)`
    pub top: usize,
    /// `(j - i) * (j - i + 1) / 2`
    pub triangular: usize,
    /// `(n - j - 1) * (j - i + 1)`
    pub bottom: usize,
}

impl BlockLengths {
    /// Lengths for the cut `(i, j)` of an `n × n` matrix.
    pub fn for_cut(n: usize, i: usize, j: usize) -> Self {
        debug_assert!(i < j && j < n, "invalid cut ({i}, {j}) for n = {n}");
        let width = j - i + 1;
        Self {
            top: i * width,
            triangular: (j - i) * width / 2,
            bottom: (n - j - 1) * width,
        }
    }

    /// Length of one region.
    pub fn get(&self, region: Region) -> usize {
        match region {
            Region::Top => self.top,
            Region::Triangular => self.triangular,
            Region::Bottom => self.bottom,
        }
    }

    /// Worst case over every cut of an `n × n` matrix.
    pub fn worst_case(n: usize) -> Self {
        let off_diagonal = n * n / 4;
        Self {
            top: off_diagonal,
            triangular: n * n.saturating_sub(1) / 2,
            bottom: off_diagonal,
        }
    }
}

/// Reusable block buffers sized once for the worst case of a dimension.
///
/// Only the prefix written by the latest [`segment_into`] call is visible.
#[derive(Debug, Clone)]
pub struct BlockScratch {
    buffers: [Vec<f64>; 3],
    written: BlockLengths,
}

impl BlockScratch {
    /// Allocate buffers large enough for any cut of an `n × n` matrix.
    pub fn for_dimension(n: usize) -> Self {
        let cap = BlockLengths::worst_case(n);
        Self {
            buffers: [
                vec![0.0; cap.top],
                vec![0.0; cap.triangular],
                vec![0.0; cap.bottom],
            ],
            written: BlockLengths::default(),
        }
    }

    /// Values written for `region` by the latest segmentation.
    pub fn region(&self, region: Region) -> &[f64] {
        &self.buffers[region.index()][..self.written.get(region)]
    }

    /// Lengths written by the latest segmentation.
    pub fn lengths(&self) -> BlockLengths {
        self.written
    }

    /// Total allocated values across the three buffers.
    pub fn capacity(&self) -> usize {
        self.buffers.iter().map(Vec::len).sum()
    }
}

/// Copy the top, triangular and bottom blocks of `matrix` at cut `(i, j)`
/// into `scratch`. Caller guarantees `i < j < n` and that `scratch` was
/// sized for `n`.
pub fn segment_into<M>(matrix: &M, i: usize, j: usize, scratch: &mut BlockScratch) -> BlockLengths
where
    M: SquareMatrix + ?Sized,
{
    let n = matrix.dim();
    let lengths = BlockLengths::for_cut(n, i, j);
    let [top, tri, bot] = &mut scratch.buffers;

    let (mut t, mut r, mut b) = (0, 0, 0);
    for col in i..=j {
        let column = matrix.column(col);

        top[t..t + i].copy_from_slice(&column[..i]);
        t += i;

        let run = col - i;
        tri[r..r + run].copy_from_slice(&column[i..col]);
        r += run;

        let below = n - j - 1;
        bot[b..b + below].copy_from_slice(&column[j + 1..]);
        b += below;
    }

    debug_assert_eq!((t, r, b), (lengths.top, lengths.triangular, lengths.bottom));
    scratch.written = lengths;
    lengths
}
