//! Fast-mode pruning of breakpoint candidates.
//!
//! The likelihood of every single-breakpoint split is profiled; only its
//! strict local maxima are kept as candidates. Since the full search is
//! O(n²) in fitted cuts, pruning to a handful of maxima pays off quickly.

use bitvec::prelude::*;
use tracing::debug;

use super::fit_region;
use crate::matrix::{ContactMatrices, DistanceMatrix, Region};
use crate::model::{PoissonDecayFitter, RegionParams};
use crate::space::Workspace;
use crate::SegmentationError;

/// Bins allowed to close a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMask {
    bits: BitVec,
}

impl CandidateMask {
    /// Every bin is a candidate.
    pub fn all(n: usize) -> Self {
        Self {
            bits: bitvec![1; n],
        }
    }

    /// Strict local maxima of `profile` over `[3, n-2]`, plus the last bin.
    pub fn from_profile(profile: &[f64]) -> Self {
        let n = profile.len();
        let mut bits = bitvec![0; n];
        for i in 3..n.saturating_sub(1) {
            if profile[i] > profile[i - 1] && profile[i] > profile[i + 1] {
                bits.set(i, true);
            }
        }
        if n > 0 {
            bits.set(n - 1, true);
        }
        Self { bits }
    }

    /// Number of bins covered.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True for a zero-bin mask.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Whether `bin` is a candidate.
    pub fn contains(&self, bin: usize) -> bool {
        self.bits.get(bin).map_or(false, |bit| *bit)
    }

    /// Whether segment `[i, j]` may be evaluated: `i - 1` and `j` are both
    /// candidates, with the virtual bin before 0 always accepted.
    pub fn admits(&self, i: usize, j: usize) -> bool {
        (i == 0 || self.contains(i - 1)) && self.contains(j)
    }

    /// Number of candidate bins.
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Candidate bins in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Whether every candidate here is also one in `other`.
    pub fn is_subset_of(&self, other: &CandidateMask) -> bool {
        self.iter().all(|bin| other.contains(bin))
    }
}

/// Single-breakpoint likelihood profile over bins.
///
/// Entry `j` for `j >= 2` holds the likelihood of splitting after bin `j`;
/// entries 0 and 1 are NaN. The forward scan fits `(0, j)` (triangular plus
/// half the bottom block); the backward scan adds `(j, n-1)` (half the top
/// block plus the triangle) to entry `j - 1`.
pub fn single_break_profile(
    matrices: &ContactMatrices,
    distances: &DistanceMatrix,
    fitter: &PoissonDecayFitter,
    workspace: &mut Workspace,
) -> Result<Vec<f64>, SegmentationError> {
    let n = matrices.dim();
    let mut profile = vec![f64::NAN; n];
    let mut params = RegionParams::new();

    for j in 2..n {
        workspace.segment_distances(distances, 0, j);
        let mut total = 0.0;
        for (replicate, matrix) in matrices.iter().enumerate() {
            workspace.segment_counts(matrix, 0, j);
            let cut = (0, j);
            total += fit_region(fitter, workspace, &mut params, Region::Triangular, cut, replicate)?
                + fit_region(fitter, workspace, &mut params, Region::Bottom, cut, replicate)? / 2.0;
        }
        profile[j] = total;
    }

    let last = n.saturating_sub(1);
    for j in (3..n.saturating_sub(3)).rev() {
        workspace.segment_distances(distances, j, last);
        let mut total = 0.0;
        for (replicate, matrix) in matrices.iter().enumerate() {
            workspace.segment_counts(matrix, j, last);
            let cut = (j, last);
            total += fit_region(fitter, workspace, &mut params, Region::Top, cut, replicate)? / 2.0
                + fit_region(fitter, workspace, &mut params, Region::Triangular, cut, replicate)?;
        }
        profile[j - 1] += total;
    }

    Ok(profile)
}

/// Candidate mask for the run: local maxima of the single-break profile in
/// fast mode, every bin otherwise.
pub fn select_candidates(
    matrices: &ContactMatrices,
    distances: &DistanceMatrix,
    fitter: &PoissonDecayFitter,
    workspace: &mut Workspace,
    fast: bool,
) -> Result<CandidateMask, SegmentationError> {
    let n = matrices.dim();
    if !fast {
        return Ok(CandidateMask::all(n));
    }
    let profile = single_break_profile(matrices, distances, fitter, workspace)?;
    let mask = CandidateMask::from_profile(&profile);
    debug!(n, candidates = mask.count(), "pruned breakpoint candidates");
    Ok(mask)
}
