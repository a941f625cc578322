use super::{gaussian_similarity, inverse_sqrt_degrees, normalize_row, row_degree};
use crate::{Matrix, Result};
use num_traits::Float;
use tracing::debug;

pub(crate) fn similarity<T: Float>(points: &[Vec<T>]) -> Matrix<T> {
    let n_samples = points.len();
    let mut similarity = Matrix::zeros(n_samples, n_samples);
    for i in 0..n_samples {
        for j in (i + 1)..n_samples {
            let s = gaussian_similarity(&points[i], &points[j]);
            similarity[(i, j)] = s;
            similarity[(j, i)] = s;
        }
    }
    debug!(n_samples, "built similarity matrix");
    similarity
}

pub(crate) fn degree<T: Float>(similarity: &Matrix<T>) -> Matrix<T> {
    let n_samples = similarity.rows();
    let mut degree = Matrix::zeros(n_samples, n_samples);
    for i in 0..n_samples {
        degree[(i, i)] = row_degree(similarity.row(i));
    }
    degree
}

pub(crate) fn normalize<T: Float>(similarity: &Matrix<T>, degree: &Matrix<T>) -> Result<Matrix<T>> {
    let inv_sqrt = inverse_sqrt_degrees(degree)?;
    let n_samples = similarity.rows();
    let mut normalized = Matrix::zeros(n_samples, n_samples);
    for i in 0..n_samples {
        normalize_row(similarity.row(i), &inv_sqrt, i, normalized.row_mut(i));
    }
    debug!(n_samples, "built normalized similarity matrix");
    Ok(normalized)
}
