//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tadseg::{ContactMatrices, ContactMatrix, SegmentationConfig, Segmenter};

fn domain_matrix(n: usize, width: usize) -> ContactMatrix {
    ContactMatrix::from_fn(n, |row, col| {
        let d = row.abs_diff(col) as f64;
        let (a, b) = if row / width == col / width {
            (3.0, -0.3)
        } else {
            (0.5, -0.05)
        };
        ((a + b * d).exp() * 10.0).round()
    })
}

fn benchmark_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment");
    for n in [24usize, 48] {
        let matrices = ContactMatrices::new(vec![domain_matrix(n, 8)]).expect("valid matrix");
        for fast in [false, true] {
            let segmenter = Segmenter::new(SegmentationConfig::default().with_fast(fast));
            let label = if fast { "fast" } else { "full" };
            group.bench_with_input(BenchmarkId::new(label, n), &matrices, |b, m| {
                b.iter(|| black_box(segmenter.run(m).expect("segmentation succeeds")));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, benchmark_segmentation);
criterion_main!(benches);
