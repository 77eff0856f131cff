//! Log-likelihood of every admissible segment `[i, j]`.

use tracing::debug;

use super::{fit_region, CandidateMask};
use crate::matrix::{ContactMatrices, DistanceMatrix, Region};
use crate::model::{PoissonDecayFitter, RegionParams};
use crate::space::Workspace;
use crate::SegmentationError;

/// Sparse `n × n` table of segment log-likelihoods.
///
/// Entry `(i, j)` is the likelihood of `[i, j]` as one domain with the rows
/// above and below it; entries never evaluated hold NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct LikelihoodMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl LikelihoodMatrix {
    /// All entries unevaluated.
    pub fn new(n: usize) -> Self {
        Self {
            dim: n,
            values: vec![f64::NAN; n * n],
        }
    }

    /// Build from explicit `(i, j, value)` entries; the rest stay NaN.
    pub fn from_entries(n: usize, entries: impl IntoIterator<Item = (usize, usize, f64)>) -> Self {
        let mut matrix = Self::new(n);
        for (i, j, value) in entries {
            matrix.set(i, j, value);
        }
        matrix
    }

    /// Dimension `n`.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Stored value, NaN when unevaluated or out of range.
    #[inline]
    pub fn raw(&self, i: usize, j: usize) -> f64 {
        if i < self.dim && j < self.dim {
            self.values[i * self.dim + j]
        } else {
            f64::NAN
        }
    }

    /// Evaluated value at `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let value = self.raw(i, j);
        (!value.is_nan()).then_some(value)
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.dim + j] = value;
    }

    /// Number of evaluated entries.
    pub fn evaluated(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }

    /// Rows of the matrix, for display.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.values.chunks(self.dim.max(1)).take(self.dim)
    }
}

/// Fills a [`LikelihoodMatrix`] for every admissible cut.
///
/// Each replicate contributes `top / 2 + triangular + bottom / 2`: top and
/// bottom blocks are shared with the neighbouring segments of a chain and
/// would otherwise be counted twice.
#[derive(Debug)]
pub struct LikelihoodMatrixBuilder<'a> {
    matrices: &'a ContactMatrices,
    distances: &'a DistanceMatrix,
    fitter: &'a PoissonDecayFitter,
    params: RegionParams,
}

impl<'a> LikelihoodMatrixBuilder<'a> {
    /// Builder over `matrices`, with warm-start slots at `(0, 0)`.
    pub fn new(
        matrices: &'a ContactMatrices,
        distances: &'a DistanceMatrix,
        fitter: &'a PoissonDecayFitter,
    ) -> Self {
        Self {
            matrices,
            distances,
            fitter,
            params: RegionParams::new(),
        }
    }

    /// Evaluate every `(i, j)` with `i + 2 <= j < n` admitted by `mask`.
    pub fn build(
        &mut self,
        mask: &CandidateMask,
        workspace: &mut Workspace,
    ) -> Result<LikelihoodMatrix, SegmentationError> {
        let n = self.matrices.dim();
        let mut llik = LikelihoodMatrix::new(n);

        for i in 0..n.saturating_sub(2) {
            if i > 0 && !mask.contains(i - 1) {
                continue;
            }
            for j in ((i + 2)..n).filter(|&j| mask.admits(i, j)) {
                let value = self.evaluate(i, j, workspace)?;
                llik.set(i, j, value);
            }
        }

        debug!(n, evaluated = llik.evaluated(), "likelihood matrix built");
        Ok(llik)
    }

    fn evaluate(
        &mut self,
        i: usize,
        j: usize,
        workspace: &mut Workspace,
    ) -> Result<f64, SegmentationError> {
        workspace.segment_distances(self.distances, i, j);

        let mut total = 0.0;
        for (replicate, matrix) in self.matrices.iter().enumerate() {
            workspace.segment_counts(matrix, i, j);
            let mut fit = |region| {
                fit_region(self.fitter, workspace, &mut self.params, region, (i, j), replicate)
            };
            total += fit(Region::Top)? / 2.0 + fit(Region::Triangular)? + fit(Region::Bottom)? / 2.0;
        }
        Ok(total)
    }
}
