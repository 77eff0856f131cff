//! Dynamic program selecting the breakpoint set.
//!
//! Round `k` computes, for every end bin `j`, the best score of a chain of
//! `k + 1` segments covering `[0, j]`. Rounds continue while the score of the
//! chain ending at `n - 1` strictly improves; the winner is the last
//! improving round, not a global optimum over all `k`.

use tracing::debug;

use super::{BreakpointSet, LikelihoodMatrix};
use crate::SegmentationError;

/// Bins per segment in the dynamic program.
pub const MIN_SEGMENT_LEN: usize = 3;

/// Best chains for one breakpoint count.
#[derive(Debug, Clone)]
struct Round {
    /// Score of the best chain ending at each bin; `-inf`/NaN if none.
    scores: Vec<f64>,
    /// Breakpoints of that chain.
    paths: Vec<Vec<usize>>,
}

impl Round {
    /// Zero breakpoints: one segment `[0, j]`.
    fn initial(llik: &LikelihoodMatrix) -> Self {
        let n = llik.dim();
        Self {
            scores: (0..n).map(|j| llik.raw(0, j)).collect(),
            paths: vec![Vec::new(); n],
        }
    }

    fn total(&self) -> f64 {
        self.scores.last().copied().unwrap_or(f64::NAN)
    }

    /// Extend every chain by one breakpoint.
    fn advance(&self, llik: &LikelihoodMatrix, k: usize) -> Self {
        let n = llik.dim();
        let mut scores = vec![f64::NAN; n];
        let mut paths = vec![Vec::new(); n];

        for j in (MIN_SEGMENT_LEN * k + 2)..n {
            let mut best = f64::NEG_INFINITY;
            let mut from = None;
            for i in (MIN_SEGMENT_LEN * k)..(j - 1) {
                // NaN on either side never compares greater.
                let score = self.scores[i - 1] + llik.raw(i, j);
                if score > best {
                    best = score;
                    from = Some(i - 1);
                }
            }
            scores[j] = best;
            if let Some(end) = from {
                let mut path = Vec::with_capacity(k);
                path.extend_from_slice(&self.paths[end]);
                path.push(end);
                paths[j] = path;
            }
        }

        Self { scores, paths }
    }
}

/// Outcome of the dynamic program.
#[derive(Debug, Clone, PartialEq)]
pub struct DpOutcome {
    /// Selected breakpoints.
    pub breakpoints: BreakpointSet,
    /// Number of interior breakpoints accepted.
    pub rounds: usize,
    /// Score of the selected chain (NaN if even one segment is unscored).
    pub log_likelihood: f64,
}

/// Select breakpoints from `llik`.
///
/// `max_rounds` caps the number of improving rounds; hitting the cap while
/// the score still improves is an error.
pub fn optimal_breakpoints(
    llik: &LikelihoodMatrix,
    max_rounds: Option<usize>,
) -> Result<DpOutcome, SegmentationError> {
    let n = llik.dim();
    let mut best = Round::initial(llik);
    let mut rounds = 0;

    loop {
        let k = rounds + 1;
        if MIN_SEGMENT_LEN * k + 2 >= n {
            break;
        }
        let next = best.advance(llik, k);
        let (previous, total) = (best.total(), next.total());
        debug!(round = k, previous, total, "segmentation round");
        let improved = total > previous;
        if !improved {
            break;
        }
        if max_rounds.is_some_and(|limit| k > limit) {
            return Err(SegmentationError::RoundLimitExceeded { rounds: k - 1 });
        }
        best = next;
        rounds = k;
    }

    let log_likelihood = best.total();
    let ends = best.paths.pop().unwrap_or_default();
    Ok(DpOutcome {
        breakpoints: BreakpointSet::from_positions(n, ends),
        rounds,
        log_likelihood,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_improving_break() {
        let llik = LikelihoodMatrix::from_entries(6, [(0, 5, 10.0), (0, 2, 6.0), (3, 5, 5.0)]);
        let outcome = optimal_breakpoints(&llik, None).unwrap();
        assert_eq!(outcome.breakpoints.as_slice(), &[0, 0, 1, 0, 0, 1]);
        assert_eq!(outcome.rounds, 1);
        assert_eq!(outcome.log_likelihood, 11.0);
    }

    #[test]
    fn non_improving_break_is_rejected() {
        let llik = LikelihoodMatrix::from_entries(6, [(0, 5, 10.0), (0, 2, 6.0), (3, 5, 3.0)]);
        let outcome = optimal_breakpoints(&llik, None).unwrap();
        assert_eq!(outcome.breakpoints.as_slice(), &[0, 0, 0, 0, 0, 1]);
        assert_eq!(outcome.rounds, 0);
    }

    #[test]
    fn stops_at_first_round_without_improvement() {
        // Two breaks (2, 5) would score 12 > 10, but one break only reaches 9.
        let llik = LikelihoodMatrix::from_entries(
            9,
            [
                (0, 8, 10.0),
                (0, 2, 4.0),
                (3, 5, 4.0),
                (6, 8, 4.0),
                (3, 8, 5.0),
            ],
        );
        let outcome = optimal_breakpoints(&llik, None).unwrap();
        assert_eq!(outcome.breakpoints.positions(), Vec::<usize>::new());
    }

    #[test]
    fn chains_three_segments() {
        let llik = partition_likelihood(9, &[2, 5, 8]);
        let outcome = optimal_breakpoints(&llik, None).unwrap();
        assert_eq!(outcome.breakpoints.positions(), vec![2, 5]);
        assert_eq!(outcome.rounds, 2);
        assert_eq!(outcome.log_likelihood, 30.0);
    }

    #[test]
    fn rerun_on_own_partition_is_stable() {
        let llik = partition_likelihood(12, &[3, 7, 11]);
        let first = optimal_breakpoints(&llik, None).unwrap().breakpoints;
        let ends: Vec<usize> = first.domains().iter().map(|d| *d.end()).collect();
        let second = optimal_breakpoints(&partition_likelihood(12, &ends), None)
            .unwrap()
            .breakpoints;
        assert_eq!(first, second);
        assert_eq!(first.positions(), vec![3, 7]);
    }

    #[test]
    fn round_cap_is_enforced() {
        let llik = partition_likelihood(9, &[2, 5, 8]);
        let err = optimal_breakpoints(&llik, Some(1)).unwrap_err();
        assert!(matches!(err, SegmentationError::RoundLimitExceeded { rounds: 1 }));
        assert!(optimal_breakpoints(&llik, Some(2)).is_ok());
    }

    #[test]
    fn tiny_and_unscored_inputs() {
        for n in 0..3 {
            let outcome = optimal_breakpoints(&LikelihoodMatrix::new(n), None).unwrap();
            assert_eq!(outcome.breakpoints.len(), n);
            assert!(outcome.breakpoints.positions().is_empty());
        }
        let outcome = optimal_breakpoints(&LikelihoodMatrix::new(10), None).unwrap();
        assert_eq!(outcome.breakpoints.positions(), Vec::<usize>::new());
        assert!(outcome.log_likelihood.is_nan());
    }

    /// Segments of the given partition score 10, any other segment 1.
    fn partition_likelihood(n: usize, ends: &[usize]) -> LikelihoodMatrix {
        let mut segments = Vec::new();
        let mut start = 0;
        for &end in ends {
            segments.push((start, end));
            start = end + 1;
        }
        let mut entries = Vec::new();
        for i in 0..n {
            for j in (i + 2)..n {
                let value = if segments.contains(&(i, j)) { 10.0 } else { 1.0 };
                entries.push((i, j, value));
            }
        }
        LikelihoodMatrix::from_entries(n, entries)
    }
}
