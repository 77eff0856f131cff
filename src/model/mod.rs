//! Per-region decay model and its warm-start state.

mod poisson;

pub use poisson::{
    log_likelihood, DecayParams, FitError, FitOptions, FitOutcome, PoissonDecayFitter,
    DEFAULT_MAX_HALVINGS, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};

use crate::matrix::Region;

/// One warm-start parameter slot per region.
///
/// Adjacent cuts produce similar blocks, so each region starts its next fit
/// from its own previous estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegionParams {
    slots: [DecayParams; 3],
}

impl RegionParams {
    /// All slots at `(0, 0)`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable slot handed to the fitter.
    pub fn slot_mut(&mut self, region: Region) -> &mut DecayParams {
        &mut self.slots[region.index()]
    }
}
