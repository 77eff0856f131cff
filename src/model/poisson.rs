//! Maximum-likelihood fit of the log-linear Poisson decay model.
//!
//! Counts `k_i` observed at distance `d_i` are modelled as independent
//! Poisson draws with mean `exp(a + b * d_i)`. The fit runs damped
//! Newton-Raphson on the score equations
//!
//! ```text
//! F(a, b) = Σ exp(a + b d_i) - k_i
//! G(a, b) = Σ (exp(a + b d_i) - k_i) d_i
//! ```
//!
//! halving the step while `F² + G²` does not decrease.

use thiserror::Error;
use tracing::trace;

/// Convergence threshold on `F² + G²`.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;
/// Newton iterations allowed before a fit is declared failed.
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000;
/// Step halvings allowed per Newton iteration.
pub const DEFAULT_MAX_HALVINGS: usize = 64;

/// Coefficients `(a, b)` of the mean `exp(a + b * distance)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecayParams {
    /// Intercept `a`.
    pub a: f64,
    /// Decay slope `b`.
    pub b: f64,
}

impl DecayParams {
    /// Construct a parameter pair.
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// Linear predictor `a + b * distance`.
    #[inline]
    pub fn eta(&self, distance: f64) -> f64 {
        self.a + self.b * distance
    }

    /// Expected count at `distance`.
    #[inline]
    pub fn mean(&self, distance: f64) -> f64 {
        self.eta(distance).exp()
    }
}

/// Numerical limits for a single fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Stop once `F² + G²` falls to or below this value.
    pub tolerance: f64,
    /// Maximum Newton iterations.
    pub max_iterations: usize,
    /// Maximum step halvings inside one iteration.
    pub max_halvings: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_halvings: DEFAULT_MAX_HALVINGS,
        }
    }
}

impl FitOptions {
    /// Set the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the Newton iteration bound.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the per-iteration halving bound.
    pub fn with_max_halvings(mut self, max_halvings: usize) -> Self {
        self.max_halvings = max_halvings;
        self
    }
}

/// Result of a converged fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOutcome {
    /// `Σ exp(a + b d_i) + k_i (a + b d_i)` at the converged parameters.
    pub log_likelihood: f64,
    /// Newton iterations taken.
    pub iterations: usize,
}

/// Ways a fit can fail. Parameters are left untouched when this is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FitError {
    /// Iteration bound reached before the score norm met the tolerance.
    #[error("Newton-Raphson did not converge after {iterations} iterations (score norm {score_norm:e})")]
    NotConverged {
        /// Iterations performed.
        iterations: usize,
        /// `F² + G²` when the bound was hit.
        score_norm: f64,
    },

    /// No halved step reduced the score norm.
    #[error("line search stalled at iteration {iteration} after {halvings} halvings")]
    LineSearchStalled {
        /// Iteration at which the search stalled.
        iteration: usize,
        /// Halvings attempted.
        halvings: usize,
    },

    /// Jacobian could not be inverted.
    #[error("singular Jacobian at iteration {iteration}")]
    Singular {
        /// Iteration at which the system was singular.
        iteration: usize,
    },
}

/// Score vector `(F, G)` at a parameter point.
#[derive(Debug, Clone, Copy)]
struct Score {
    f: f64,
    g: f64,
}

impl Score {
    fn at(counts: &[f64], distances: &[f64], a: f64, b: f64) -> Self {
        let (mut f, mut g) = (0.0, 0.0);
        for (&k, &d) in counts.iter().zip(distances) {
            let residual = (a + b * d).exp() - k;
            f += residual;
            g += residual * d;
        }
        Self { f, g }
    }

    fn norm(&self) -> f64 {
        self.f * self.f + self.g * self.g
    }
}

/// Damped Newton-Raphson fitter for [`DecayParams`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PoissonDecayFitter {
    options: FitOptions,
}

impl PoissonDecayFitter {
    /// Create a fitter with explicit limits.
    pub fn new(options: FitOptions) -> Self {
        Self { options }
    }

    /// Limits in use.
    pub fn options(&self) -> &FitOptions {
        &self.options
    }

    /// Fit `counts` against `distances` starting from `params`.
    ///
    /// On success `params` holds the converged estimate. An empty input
    /// yields a log-likelihood of 0 and leaves `params` unchanged.
    pub fn fit(
        &self,
        counts: &[f64],
        distances: &[f64],
        params: &mut DecayParams,
    ) -> Result<FitOutcome, FitError> {
        debug_assert_eq!(counts.len(), distances.len());
        if counts.is_empty() {
            return Ok(FitOutcome {
                log_likelihood: 0.0,
                iterations: 0,
            });
        }

        let DecayParams { mut a, mut b } = *params;
        let mut score = Score::at(counts, distances, a, b);
        let mut iterations = 0;

        loop {
            let previous = score.norm();
            if previous <= self.options.tolerance {
                break;
            }
            if iterations == self.options.max_iterations {
                return Err(FitError::NotConverged {
                    iterations,
                    score_norm: previous,
                });
            }
            iterations += 1;

            // dF/db == dG/da
            let (mut dfda, mut dgda, mut dgdb) = (0.0, 0.0, 0.0);
            for &d in distances {
                let mu = (a + b * d).exp();
                dfda += mu;
                dgda += mu * d;
                dgdb += mu * d * d;
            }
            let dfdb = dgda;

            let denom = dfdb * dgda - dfda * dgdb;
            if denom == 0.0 || !denom.is_finite() {
                return Err(FitError::Singular { iteration: iterations });
            }
            let mut da = (score.f * dgdb - score.g * dfdb) / denom;
            let mut db = (score.g * dfda - score.f * dgda) / denom;

            let mut candidate = Score::at(counts, distances, a + da, b + db);
            let mut halvings = 0;
            loop {
                // A NaN or infinite norm after overflow also backtracks.
                if candidate.norm() <= previous {
                    break;
                }
                if halvings == self.options.max_halvings {
                    return Err(FitError::LineSearchStalled {
                        iteration: iterations,
                        halvings,
                    });
                }
                halvings += 1;
                da /= 2.0;
                db /= 2.0;
                candidate = Score::at(counts, distances, a + da, b + db);
            }

            a += da;
            b += db;
            score = candidate;
        }

        *params = DecayParams { a, b };
        trace!(len = counts.len(), iterations, a, b, "decay fit converged");

        Ok(FitOutcome {
            log_likelihood: log_likelihood(counts, distances, params),
            iterations,
        })
    }
}

/// Closed-form objective `Σ exp(a + b d_i) + k_i (a + b d_i)` at `params`.
pub fn log_likelihood(counts: &[f64], distances: &[f64], params: &DecayParams) -> f64 {
    counts
        .iter()
        .zip(distances)
        .map(|(&k, &d)| {
            let eta = params.eta(d);
            eta.exp() + k * eta
        })
        .sum()
}
