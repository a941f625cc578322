#![cfg(feature = "parallel")]
use super::{gaussian_similarity, inverse_sqrt_degrees, normalize_row, row_degree};
use crate::{Matrix, Result};
use num_traits::Float;
use rayon::prelude::*;
use tracing::debug;

// Each task fills a whole row. (a - b)^2 == (b - a)^2 exactly, so the result stays symmetric.
pub(crate) fn similarity<T: Float + Send + Sync>(points: &[Vec<T>]) -> Matrix<T> {
    let n_samples = points.len();
    let mut similarity = Matrix::zeros(n_samples, n_samples);
    similarity
        .as_mut_slice()
        .par_chunks_mut(n_samples)
        .enumerate()
        .for_each(|(i, row)| {
            for (j, out) in row.iter_mut().enumerate() {
                if i != j {
                    *out = gaussian_similarity(&points[i], &points[j]);
                }
            }
        });
    debug!(n_samples, "built similarity matrix in parallel");
    similarity
}

pub(crate) fn degree<T: Float + Send + Sync>(similarity: &Matrix<T>) -> Matrix<T> {
    let n_samples = similarity.rows();
    let sums: Vec<T> = (0..n_samples)
        .into_par_iter()
        .map(|i| row_degree(similarity.row(i)))
        .collect();
    let mut degree = Matrix::zeros(n_samples, n_samples);
    for (i, sum) in sums.into_iter().enumerate() {
        degree[(i, i)] = sum;
    }
    degree
}

pub(crate) fn normalize<T: Float + Send + Sync>(
    similarity: &Matrix<T>,
    degree: &Matrix<T>,
) -> Result<Matrix<T>> {
    let inv_sqrt = inverse_sqrt_degrees(degree)?;
    let n_samples = similarity.rows();
    let mut normalized = Matrix::zeros(n_samples, n_samples);
    normalized
        .as_mut_slice()
        .par_chunks_mut(n_samples)
        .enumerate()
        .for_each(|(i, row)| normalize_row(similarity.row(i), &inv_sqrt, i, row));
    debug!(n_samples, "built normalized similarity matrix in parallel");
    Ok(normalized)
}
