//! Full runs on synthetic matrices with known domain structure.

mod common;

use common::*;
use tadseg::{find_breakpoints, ContactMatrix, SegmentationConfig, Segmenter};
use test_case::test_case;

#[test]
fn two_decay_laws_split_at_transition() {
    let matrix = two_law_matrix(6, 3, (1.0, -0.5), (0.2, -0.1));
    let matrices = replicates(vec![matrix]);

    let breakpoints = find_breakpoints(&matrices, false).expect("segmentation succeeds");
    assert_eq!(breakpoints.as_slice(), &[0, 0, 1, 0, 0, 1]);
    assert_eq!(breakpoints.domains(), vec![0..=2, 3..=5]);
}

#[test]
fn uniform_replicates_have_no_interior_breakpoint() {
    let uniform = ContactMatrix::from_fn(4, |_, _| 5.0);
    let matrices = replicates(vec![uniform.clone(), uniform]);

    let breakpoints = find_breakpoints(&matrices, false).expect("segmentation succeeds");
    assert_eq!(breakpoints.as_slice(), &[0, 0, 0, 1]);
}

#[test_case(12, &[6], &[5]; "two domains")]
#[test_case(15, &[5, 10], &[4, 9]; "three domains")]
#[test_case(20, &[7, 14], &[6, 13]; "three uneven domains")]
fn recovers_domain_boundaries(n: usize, starts: &[usize], expected: &[usize]) {
    let matrices = replicates(vec![domain_matrix(n, starts)]);

    for fast in [false, true] {
        let result = Segmenter::new(SegmentationConfig::default().with_fast(fast))
            .run(&matrices)
            .expect("segmentation succeeds");
        assert_eq!(result.breakpoints.positions(), expected, "fast = {fast}");
        assert_eq!(result.rounds, expected.len());
        assert_eq!(result.breakpoints.as_slice()[n - 1], 1);
        assert!(result.log_likelihood.is_finite());
    }
}

#[test]
fn fast_candidates_are_local_maxima_subset() {
    let n = 15;
    let matrices = replicates(vec![domain_matrix(n, &[5, 10])]);

    let slow = Segmenter::new(SegmentationConfig::default())
        .run(&matrices)
        .expect("slow run succeeds");
    let fast = Segmenter::new(SegmentationConfig::default().with_fast(true))
        .run(&matrices)
        .expect("fast run succeeds");

    assert_eq!(slow.candidates.count(), n);
    assert!(fast.candidates.is_subset_of(&slow.candidates));
    assert_eq!(fast.candidates.iter().collect::<Vec<_>>(), vec![4, 9, 14]);
    for bin in fast.breakpoints.positions() {
        assert!(fast.candidates.contains(bin));
    }
}

#[test]
fn replicates_agree_with_single_matrix() {
    let matrix = domain_matrix(12, &[6]);
    let single = find_breakpoints(&replicates(vec![matrix.clone()]), false).unwrap();
    let triple = find_breakpoints(&replicates(vec![matrix.clone(), matrix.clone(), matrix]), false)
        .unwrap();
    assert_eq!(single, triple);
}

#[test]
fn likelihood_matrix_is_exposed_for_inspection() {
    let matrices = replicates(vec![domain_matrix(9, &[4])]);
    let (candidates, llik) = Segmenter::new(SegmentationConfig::default())
        .likelihood_matrix(&matrices)
        .unwrap();
    assert_eq!(candidates.len(), 9);
    assert_eq!(llik.dim(), 9);
    assert!(llik.get(0, 8).is_some());
    assert!(llik.get(0, 1).is_none());
    assert!(llik.get(5, 3).is_none());
}
