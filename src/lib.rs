//! # TAD Breakpoint Detection via Poisson Decay Segmentation
//!
//! This library finds the boundaries of topologically associating domains
//! in Hi-C contact matrices.
//!
//! ## Core Algorithm
//!
//! 1. **Decay model**: contacts at distance `d` are Poisson with mean `exp(a + b·d)`
//! 2. **Segment scoring**: every segment `[i, j]` cuts each matrix into top,
//!    triangular and bottom blocks, each fitted independently
//! 3. **Candidate pruning** (fast mode): keep only local maxima of the
//!    single-breakpoint likelihood profile
//! 4. **Dynamic program**: chain segments of at least 3 bins while the total
//!    log-likelihood improves
//!
//! ## Usage Example
//!
//! ```
//! use tadseg::{ContactMatrices, ContactMatrix, SegmentationConfig, Segmenter};
//!
//! let matrix = ContactMatrix::from_fn(6, |r, c| {
//!     let d = r.abs_diff(c) as f64;
//!     if r < 3 && c < 3 { (1.0 - 0.5 * d).exp() } else { (0.2 - 0.1 * d).exp() }
//! });
//! let matrices = ContactMatrices::new(vec![matrix])?;
//! let result = Segmenter::new(SegmentationConfig::default()).run(&matrices)?;
//! assert_eq!(result.breakpoints.as_slice(), &[0, 0, 1, 0, 0, 1]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod matrix;    // Contact/distance matrices and block segmentation
pub mod model;     // Poisson decay fitting
pub mod search;    // Candidate pruning, likelihood matrix, dynamic program
pub mod space;     // Reusable scratch storage
/// Python bindings for exposing the segmenter to external runtimes.
#[cfg(feature = "python-bindings")]
pub mod python_bindings;

// Re-exports for convenience
pub use matrix::{ContactMatrices, ContactMatrix, DistanceMatrix, MatrixError, Region};
pub use model::{DecayParams, FitError, FitOptions, PoissonDecayFitter};
pub use search::{BreakpointSet, CandidateMask, LikelihoodMatrix};

use thiserror::Error;
use tracing::info;

use search::{optimal_breakpoints, select_candidates, LikelihoodMatrixBuilder};
use space::Workspace;

/// Main segmentation orchestrator
///
/// Owns the configuration; every [`Segmenter::run`] allocates its own
/// scratch and shares nothing with other runs.
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmentationConfig,
}

/// Configuration parameters for segmentation
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationConfig {
    /// Restrict breakpoints to local maxima of the single-break profile
    pub fast: bool,

    /// Limits applied to every decay fit
    pub fit: FitOptions,

    /// Cap on improving dynamic-programming rounds (`None`: structural bound)
    pub max_rounds: Option<usize>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            fast: false,
            fit: FitOptions::default(),
            max_rounds: None,
        }
    }
}

impl SegmentationConfig {
    /// Enable or disable fast-mode candidate pruning.
    pub fn with_fast(mut self, fast: bool) -> Self {
        self.fast = fast;
        self
    }

    /// Replace the fit limits.
    pub fn with_fit_options(mut self, fit: FitOptions) -> Self {
        self.fit = fit;
        self
    }

    /// Cap the number of breakpoints the dynamic program may add.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }
}

/// Result of segmentation
#[derive(Debug, Clone)]
pub struct SegmentationResult {
    /// Selected breakpoints; the last bin is always set
    pub breakpoints: BreakpointSet,

    /// Bins considered as segment ends
    pub candidates: CandidateMask,

    /// Number of interior breakpoints accepted by the dynamic program
    pub rounds: usize,

    /// Total log-likelihood of the selected segmentation
    pub log_likelihood: f64,
}

/// Errors that can occur during segmentation
#[derive(Error, Debug)]
pub enum SegmentationError {
    /// Input matrices failed validation
    #[error("invalid input: {0}")]
    Matrix(#[from] MatrixError),

    /// Decay fit failed for one block of one cut
    #[error("fit failed for {region} block of segment [{start}, {end}] in replicate {replicate}: {source}")]
    Fit {
        /// Block that failed
        region: Region,
        /// First bin of the segment
        start: usize,
        /// Last bin of the segment
        end: usize,
        /// Replicate index
        replicate: usize,
        /// Underlying fitter error
        #[source]
        source: FitError,
    },

    /// Score still improving when the round cap was reached
    #[error("breakpoint search still improving after {rounds} rounds")]
    RoundLimitExceeded {
        /// Rounds accepted before the cap
        rounds: usize,
    },
}

impl Segmenter {
    /// Create new segmenter
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Candidate mask and likelihood matrix for `matrices`, without the
    /// dynamic program.
    pub fn likelihood_matrix(
        &self,
        matrices: &ContactMatrices,
    ) -> Result<(CandidateMask, LikelihoodMatrix), SegmentationError> {
        let n = matrices.dim();
        let distances = DistanceMatrix::new(n);
        let fitter = PoissonDecayFitter::new(self.config.fit);
        let mut workspace = Workspace::for_dimension(n);

        let candidates =
            select_candidates(matrices, &distances, &fitter, &mut workspace, self.config.fast)?;
        let llik = LikelihoodMatrixBuilder::new(matrices, &distances, &fitter)
            .build(&candidates, &mut workspace)?;
        Ok((candidates, llik))
    }

    /// Run segmentation on validated replicate matrices
    ///
    /// This is the main entry point that orchestrates:
    /// 1. Distance matrix and scratch allocation
    /// 2. Optional candidate pruning
    /// 3. Likelihood matrix construction
    /// 4. Dynamic-programming breakpoint selection
    pub fn run(&self, matrices: &ContactMatrices) -> Result<SegmentationResult, SegmentationError> {
        let (candidates, llik) = self.likelihood_matrix(matrices)?;
        let outcome = optimal_breakpoints(&llik, self.config.max_rounds)?;

        info!(
            n = matrices.dim(),
            replicates = matrices.len(),
            fast = self.config.fast,
            breakpoints = outcome.rounds,
            "segmentation complete"
        );

        Ok(SegmentationResult {
            breakpoints: outcome.breakpoints,
            candidates,
            rounds: outcome.rounds,
            log_likelihood: outcome.log_likelihood,
        })
    }
}

/// One-call segmentation with default fit limits.
pub fn find_breakpoints(
    matrices: &ContactMatrices,
    fast: bool,
) -> Result<BreakpointSet, SegmentationError> {
    let config = SegmentationConfig::default().with_fast(fast);
    Segmenter::new(config).run(matrices).map(|result| result.breakpoints)
}
