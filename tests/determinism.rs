mod common;

use std::collections::HashSet;

use blake3::Hasher;
use common::*;
use tadseg::{SegmentationConfig, Segmenter};

#[test]
fn segmentation_is_deterministic() {
    let matrices = replicates(vec![domain_matrix(14, &[4, 9]), domain_matrix(14, &[4, 9])]);

    let mut fingerprints = HashSet::new();
    for _ in 0..5 {
        let result = Segmenter::new(SegmentationConfig::default().with_fast(true))
            .run(&matrices)
            .expect("segmentation succeeds");

        let mut hasher = Hasher::new();
        hasher.update(result.breakpoints.as_slice());
        hasher.update(&result.log_likelihood.to_bits().to_le_bytes());
        fingerprints.insert(hasher.finalize());
    }

    assert_eq!(fingerprints.len(), 1, "outputs diverged across runs");
}
