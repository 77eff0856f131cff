//! Block length laws of the matrix segmenter.

use proptest::prelude::*;
use tadseg::matrix::{segment_into, BlockLengths, BlockScratch, ContactMatrix, Region};
use test_case::test_case;

#[test_case(5, 0, 4 => (0, 10, 0); "whole matrix")]
#[test_case(5, 1, 3 => (3, 3, 3); "interior")]
#[test_case(6, 0, 2 => (0, 3, 9); "leading segment")]
#[test_case(6, 3, 5 => (9, 3, 0); "trailing segment")]
#[test_case(4, 1, 2 => (2, 1, 2); "two bins")]
fn block_lengths(n: usize, i: usize, j: usize) -> (usize, usize, usize) {
    let matrix = ContactMatrix::from_fn(n, |r, c| (r + c) as f64);
    let mut scratch = BlockScratch::for_dimension(n);
    let lengths = segment_into(&matrix, i, j, &mut scratch);
    (lengths.top, lengths.triangular, lengths.bottom)
}

proptest! {
    #[test]
    fn lengths_follow_closed_form(n in 2usize..24, a in 0usize..24, b in 0usize..24) {
        let (i, j) = (a.min(b) % n, a.max(b) % n);
        prop_assume!(i < j);

        let matrix = ContactMatrix::from_fn(n, |r, c| (r * n + c) as f64);
        let mut scratch = BlockScratch::for_dimension(n);
        let lengths = segment_into(&matrix, i, j, &mut scratch);

        prop_assert_eq!(lengths, BlockLengths::for_cut(n, i, j));
        prop_assert_eq!(lengths.top, i * (j - i + 1));
        prop_assert_eq!(lengths.triangular, (j - i) * (j - i + 1) / 2);
        prop_assert_eq!(lengths.bottom, (n - j - 1) * (j - i + 1));

        let mut values: Vec<f64> = Region::ALL
            .iter()
            .flat_map(|&region| scratch.region(region).to_vec())
            .collect();
        let total = values.len();
        values.sort_by(f64::total_cmp);
        values.dedup();
        prop_assert_eq!(values.len(), total, "an entry was copied twice");
    }
}
