//! Replicate contact matrices and the validation applied before segmentation.

use thiserror::Error;

use super::SquareMatrix;

/// Errors raised while validating contact matrices handed to the core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatrixError {
    /// No replicate matrices were supplied.
    #[error("at least one contact matrix is required")]
    NoReplicates,

    /// A matrix with zero bins was supplied.
    #[error("contact matrix must have at least one bin")]
    Empty,

    /// Input must be a square matrix.
    #[error("input must be a square matrix (got {rows} x {cols})")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns (or the offending row length).
        cols: usize,
    },

    /// Flat buffer does not hold `n * n` values.
    #[error("expected {expected} values, found {found}")]
    LengthMismatch {
        /// Number of values implied by the shape.
        expected: usize,
        /// Number of values supplied.
        found: usize,
    },

    /// All matrices must have the same dimensions.
    #[error("all matrices must have same dimensions: replicate {replicate} is {found} x {found}, expected {expected} x {expected}")]
    DimensionMismatch {
        /// Index of the offending replicate.
        replicate: usize,
        /// Dimension of the first replicate.
        expected: usize,
        /// Dimension of the offending replicate.
        found: usize,
    },

    /// Counts must be finite and non-negative.
    #[error("invalid count {value} at ({row}, {col}) in replicate {replicate}")]
    InvalidCount {
        /// Index of the offending replicate.
        replicate: usize,
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
        /// Offending value.
        value: f64,
    },

    /// Shape error located in a specific replicate.
    #[error("replicate {replicate}: {source}")]
    Replicate {
        /// Index of the offending replicate.
        replicate: usize,
        /// Underlying shape error.
        #[source]
        source: Box<MatrixError>,
    },
}

impl MatrixError {
    fn in_replicate(self, replicate: usize) -> Self {
        MatrixError::Replicate {
            replicate,
            source: Box::new(self),
        }
    }
}

/// One replicate `n × n` matrix of contact counts, stored column-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl ContactMatrix {
    /// Build an `n × n` matrix from a column-major buffer, the layout R and
    /// Fortran hand over.
    pub fn from_column_major(n: usize, values: Vec<f64>) -> Result<Self, MatrixError> {
        if values.len() != n * n {
            return Err(MatrixError::LengthMismatch {
                expected: n * n,
                found: values.len(),
            });
        }
        Ok(Self { dim: n, values })
    }

    /// Build from a list of rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let n = rows.len();
        if let Some(bad) = rows.iter().find(|row| row.len() != n) {
            return Err(MatrixError::NotSquare {
                rows: n,
                cols: bad.len(),
            });
        }

        let mut values = vec![0.0; n * n];
        for (row, entries) in rows.iter().enumerate() {
            for (col, &value) in entries.iter().enumerate() {
                values[row + col * n] = value;
            }
        }
        Ok(Self { dim: n, values })
    }

    /// Build an `n × n` matrix by evaluating `f(row, col)` for every entry.
    pub fn from_fn(n: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut values = Vec::with_capacity(n * n);
        for col in 0..n {
            for row in 0..n {
                values.push(f(row, col));
            }
        }
        Self { dim: n, values }
    }

    fn first_invalid(&self) -> Option<(usize, usize, f64)> {
        self.values
            .iter()
            .position(|v| !v.is_finite() || *v < 0.0)
            .map(|idx| (idx % self.dim, idx / self.dim, self.values[idx]))
    }
}

impl SquareMatrix for ContactMatrix {
    fn dim(&self) -> usize {
        self.dim
    }

    fn column(&self, col: usize) -> &[f64] {
        &self.values[col * self.dim..(col + 1) * self.dim]
    }
}

/// Validated set of `m` replicate contact matrices sharing one dimension `n`.
#[derive(Debug, Clone)]
pub struct ContactMatrices {
    dim: usize,
    replicates: Vec<ContactMatrix>,
}

impl ContactMatrices {
    /// Validate replicates: non-empty, same dimension, finite non-negative counts.
    pub fn new(replicates: Vec<ContactMatrix>) -> Result<Self, MatrixError> {
        let first = replicates.first().ok_or(MatrixError::NoReplicates)?;
        let dim = first.dim;
        if dim == 0 {
            return Err(MatrixError::Empty);
        }

        for (replicate, matrix) in replicates.iter().enumerate() {
            if matrix.dim != dim {
                return Err(MatrixError::DimensionMismatch {
                    replicate,
                    expected: dim,
                    found: matrix.dim,
                });
            }
            if let Some((row, col, value)) = matrix.first_invalid() {
                return Err(MatrixError::InvalidCount {
                    replicate,
                    row,
                    col,
                    value,
                });
            }
        }

        Ok(Self { dim, replicates })
    }

    /// Validate a nested `replicate -> row -> value` list.
    pub fn from_nested(replicates: Vec<Vec<Vec<f64>>>) -> Result<Self, MatrixError> {
        let matrices = replicates
            .into_iter()
            .enumerate()
            .map(|(idx, rows)| ContactMatrix::from_rows(rows).map_err(|e| e.in_replicate(idx)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(matrices)
    }

    /// Number of bins `n`.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of replicates `m`.
    pub fn len(&self) -> usize {
        self.replicates.len()
    }

    /// Always false for a validated set.
    pub fn is_empty(&self) -> bool {
        self.replicates.is_empty()
    }

    /// Iterate over replicates in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, ContactMatrix> {
        self.replicates.iter()
    }
}

impl<'a> IntoIterator for &'a ContactMatrices {
    type Item = &'a ContactMatrix;
    type IntoIter = std::slice::Iter<'a, ContactMatrix>;

    fn into_iter(self) -> Self::IntoIter {
        self.replicates.iter()
    }
}
