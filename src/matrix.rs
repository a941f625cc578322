use crate::{Result, SymNmfError};
use num_traits::Float;
use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A dense, row-major matrix backed by one contiguous buffer.
///
/// Every matrix in the pipeline (similarity, degree, normalized similarity, the factor H and the
/// k-means centroids) is one of these, indexed by `(row, col)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Float> Matrix<T> {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![T::zero(); rows * cols],
        }
    }

    /// Wraps a row-major buffer of `rows * cols` values.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(SymNmfError::InvalidInput(format!(
                "Buffer of length {} cannot hold a {rows}x{cols} matrix",
                data.len()
            )));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Copies a collection of equally sized rows into a contiguous matrix.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let n_cols = rows.first().map_or(0, |row| row.len());
        let mut data = Vec::with_capacity(rows.len() * n_cols);
        for (n, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(SymNmfError::InvalidInput(format!(
                    "0th row has {n_cols} columns, but {n}th has {}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Matrix {
            rows: rows.len(),
            cols: n_cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }

    pub fn transpose(&self) -> Matrix<T> {
        let mut transposed = Matrix::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                transposed[(c, r)] = self[(r, c)];
            }
        }
        transposed
    }

    /// Matrix product `self · other`.
    pub fn matmul(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        self.check_product_shape(other)?;
        let mut product = Matrix::zeros(self.rows, other.cols);
        if other.cols == 0 {
            return Ok(product);
        }
        product
            .data
            .chunks_mut(other.cols)
            .enumerate()
            .for_each(|(r, out_row)| matmul_row(self.row(r), other, out_row));
        Ok(product)
    }

    pub fn sum(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc + x)
    }

    /// Mean over every entry. Zero for an empty matrix.
    pub fn mean(&self) -> T {
        if self.data.is_empty() {
            return T::zero();
        }
        self.sum() / T::from(self.data.len()).unwrap_or(T::one())
    }

    /// Squared Frobenius norm of `self - other`.
    pub fn squared_frobenius_distance(&self, other: &Matrix<T>) -> Result<T> {
        if self.shape() != other.shape() {
            return Err(SymNmfError::InvalidFactorizationInput(format!(
                "Cannot compare a {}x{} matrix with a {}x{} matrix",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        Ok(self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| (a - b) * (a - b))
            .fold(T::zero(), std::ops::Add::add))
    }

    pub fn is_symmetric(&self, tolerance: T) -> bool {
        if !self.is_square() {
            return false;
        }
        for i in 0..self.rows {
            for j in (i + 1)..self.cols {
                if (self[(i, j)] - self[(j, i)]).abs() > tolerance {
                    return false;
                }
            }
        }
        true
    }

    fn check_product_shape(&self, other: &Matrix<T>) -> Result<()> {
        if self.cols != other.rows {
            return Err(SymNmfError::InvalidFactorizationInput(format!(
                "Cannot multiply a {}x{} matrix by a {}x{} matrix",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        Ok(())
    }
}

#[cfg(feature = "parallel")]
impl<T: Float + Send + Sync> Matrix<T> {
    /// Matrix product `self · other`, computed one output row per task. Each cell is summed in
    /// the same order as [`Matrix::matmul`], so both give identical results.
    pub fn matmul_par(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        self.check_product_shape(other)?;
        let mut product = Matrix::zeros(self.rows, other.cols);
        if other.cols == 0 {
            return Ok(product);
        }
        product
            .data
            .par_chunks_mut(other.cols)
            .enumerate()
            .for_each(|(r, out_row)| matmul_row(self.row(r), other, out_row));
        Ok(product)
    }
}

// i-k-j ordering: each out_row[j] still accumulates over k in ascending order.
fn matmul_row<T: Float>(lhs_row: &[T], rhs: &Matrix<T>, out_row: &mut [T]) {
    for (k, &lhs) in lhs_row.iter().enumerate() {
        if lhs == T::zero() {
            continue;
        }
        for (out, &rhs_val) in out_row.iter_mut().zip(rhs.row(k)) {
            *out = *out + lhs * rhs_val;
        }
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        &mut self.data[row * self.cols + col]
    }
}

/// One line per row, values to 4 decimal places, comma separated.
impl<T: Float> Display for Matrix<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for r in 0..self.rows {
            let line = self
                .row(r)
                .iter()
                .map(|value| format!("{:.4}", value.to_f64().unwrap_or(f64::NAN)))
                .collect::<Vec<_>>()
                .join(",");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
