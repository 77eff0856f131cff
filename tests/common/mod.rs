#![allow(dead_code)]

use tadseg::{ContactMatrices, ContactMatrix};

/// Exact decay `exp(a + b·d)`: `inside` when both bins are below `cut`,
/// `outside` otherwise.
pub fn two_law_matrix(n: usize, cut: usize, inside: (f64, f64), outside: (f64, f64)) -> ContactMatrix {
    ContactMatrix::from_fn(n, |row, col| {
        let d = row.abs_diff(col) as f64;
        let (a, b) = if row < cut && col < cut { inside } else { outside };
        (a + b * d).exp()
    })
}

/// Integer counts with strong decay inside domains and weak decay between
/// them. `starts` lists the first bin of every domain after the first.
pub fn domain_matrix(n: usize, starts: &[usize]) -> ContactMatrix {
    let domain_of = |bin: usize| starts.iter().filter(|&&start| bin >= start).count();
    ContactMatrix::from_fn(n, |row, col| {
        let d = row.abs_diff(col) as f64;
        let (a, b) = if domain_of(row) == domain_of(col) {
            (3.0, -0.3)
        } else {
            (0.5, -0.05)
        };
        ((a + b * d).exp() * 10.0).round()
    })
}

pub fn replicates(matrices: Vec<ContactMatrix>) -> ContactMatrices {
    ContactMatrices::new(matrices).expect("synthetic matrices are valid")
}
