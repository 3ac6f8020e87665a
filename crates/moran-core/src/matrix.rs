//! Payoff and transition matrices indexed by label pairs.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tolerance for row sums of a transition matrix
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Dense square matrix stored row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquareMatrix {
    dim: usize,
    values: Vec<f64>,
}

impl SquareMatrix {
    /// Build a matrix from its rows, rejecting ragged or non-square input
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let dim = rows.len();
        if dim == 0 {
            return Err(Error::Validation("Matrix has no rows".to_string()));
        }

        let mut values = Vec::with_capacity(dim * dim);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(Error::Validation(format!(
                    "Matrix is not square: row {} has {} entries, expected {}",
                    r,
                    row.len(),
                    dim
                )));
            }
            values.extend_from_slice(row);
        }

        Ok(Self { dim, values })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.dim + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.dim..(row + 1) * self.dim]
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.dim).map(<[f64]>::to_vec).collect()
    }
}

/// Payoff matrix for either the birth or the death process.
///
/// Entry `(r, c)` is the payoff an individual of label `r` receives from an
/// interaction with an individual of label `c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffMatrix(SquareMatrix);

impl PayoffMatrix {
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let matrix = SquareMatrix::from_rows(rows)?;

        for r in 0..matrix.dim() {
            for (c, &value) in matrix.row(r).iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(Error::incorrect_value(
                        "Payoff Matrix",
                        format!("Entry ({}, {}) = {} must be finite and non-negative.", r, c, value),
                    ));
                }
            }
        }

        Ok(Self(matrix))
    }

    pub fn dim(&self) -> usize {
        self.0.dim()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0.get(row, col)
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.0.to_rows()
    }
}

/// Row-stochastic matrix of label switching probabilities.
///
/// Row `r` is the distribution of the new label of an individual currently
/// labelled `r`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionMatrix(SquareMatrix);

impl TransitionMatrix {
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let matrix = SquareMatrix::from_rows(rows)?;

        for r in 0..matrix.dim() {
            let row = matrix.row(r);
            if row.iter().any(|p| !p.is_finite() || *p < 0.0 || *p > 1.0) {
                return Err(Error::incorrect_value(
                    "Transition Matrix",
                    format!("Row {} contains a probability outside [0, 1].", r),
                ));
            }

            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(Error::incorrect_value(
                    "Transition Matrix",
                    "Transition probabilities need to add up to 1.0.",
                ));
            }
        }

        Ok(Self(matrix))
    }

    /// Identity transitions: every label stays as it is
    pub fn identity(dim: usize) -> Self {
        let rows: Vec<Vec<f64>> = (0..dim)
            .map(|r| (0..dim).map(|c| if r == c { 1.0 } else { 0.0 }).collect())
            .collect();
        Self(SquareMatrix {
            dim,
            values: rows.concat(),
        })
    }

    pub fn dim(&self) -> usize {
        self.0.dim()
    }

    pub fn probability(&self, from: usize, to: usize) -> f64 {
        self.0.get(from, to)
    }

    pub fn row(&self, from: usize) -> &[f64] {
        self.0.row(from)
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.0.to_rows()
    }
}
