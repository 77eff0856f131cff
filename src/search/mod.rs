//! Breakpoint search: candidate pruning, likelihood matrix, dynamic program.

mod breakpoints;
mod candidates;
mod dp;
mod likelihood;

pub use breakpoints::BreakpointSet;
pub use candidates::{select_candidates, single_break_profile, CandidateMask};
pub use dp::{optimal_breakpoints, DpOutcome, MIN_SEGMENT_LEN};
pub use likelihood::{LikelihoodMatrix, LikelihoodMatrixBuilder};

use tracing::warn;

use crate::matrix::Region;
use crate::model::{PoissonDecayFitter, RegionParams};
use crate::space::Workspace;
use crate::SegmentationError;

/// Fit `region` of the blocks currently held in `workspace`.
///
/// Failures carry the cut and replicate so the caller can report which
/// configuration could not be fitted.
pub(crate) fn fit_region(
    fitter: &PoissonDecayFitter,
    workspace: &Workspace,
    params: &mut RegionParams,
    region: Region,
    cut: (usize, usize),
    replicate: usize,
) -> Result<f64, SegmentationError> {
    let counts = workspace.counts().region(region);
    let distances = workspace.distances().region(region);
    match fitter.fit(counts, distances, params.slot_mut(region)) {
        Ok(outcome) => Ok(outcome.log_likelihood),
        Err(source) => {
            warn!(
                %region,
                start = cut.0,
                end = cut.1,
                replicate,
                len = counts.len(),
                error = %source,
                "decay fit failed"
            );
            Err(SegmentationError::Fit {
                region,
                start: cut.0,
                end: cut.1,
                replicate,
                source,
            })
        }
    }
}
