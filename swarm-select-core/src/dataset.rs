//! Dense row-major feature matrix and label helpers.

use crate::{Error, Result};

/// Class label
pub type Label = u32;

/// Dense `rows × cols` matrix of features, stored row-major.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    /// Create a matrix from row-major data.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        let expected = rows * cols;
        if data.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Create a matrix from a list of equally sized rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::DimensionMismatch {
                    expected: cols,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Number of samples
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of feature columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Borrow a single row
    pub fn row(&self, index: usize) -> &[f64] {
        let start = index * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Iterate over rows in order
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact(0) panics, and a zero-column matrix has no row data anyway
        let width = self.cols.max(1);
        self.data
            .chunks_exact(width)
            .take(if self.cols == 0 { 0 } else { self.rows })
    }

    /// Copy of the matrix restricted to `columns`, in the given order.
    pub fn select_columns(&self, columns: &[usize]) -> Self {
        let mut data = Vec::with_capacity(self.rows * columns.len());
        for row in self.iter_rows() {
            data.extend(columns.iter().map(|&c| row[c]));
        }
        Self {
            rows: self.rows,
            cols: columns.len(),
            data,
        }
    }

    /// Split into `(first at rows, remaining rows)` without shuffling.
    pub fn split_rows(&self, at: usize) -> (Self, Self) {
        let at = at.min(self.rows);
        let (head, tail) = self.data.split_at(at * self.cols);
        (
            Self {
                rows: at,
                cols: self.cols,
                data: head.to_vec(),
            },
            Self {
                rows: self.rows - at,
                cols: self.cols,
                data: tail.to_vec(),
            },
        )
    }
}

/// Number of distinct labels
pub fn distinct_classes(labels: &[Label]) -> usize {
    let mut seen: Vec<Label> = labels.to_vec();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

/// Fraction of positions where `predicted` matches `expected`.
///
/// Returns 0.0 for an empty `expected`. Missing predictions count as misses.
pub fn accuracy(predicted: &[Label], expected: &[Label]) -> f64 {
    if expected.is_empty() {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(expected)
        .filter(|(p, e)| p == e)
        .count();
    correct as f64 / expected.len() as f64
}
