use crate::distance::nearest_row;
use crate::validation::DataValidator;
use crate::{Matrix, Result, SymNmfError};
use num_traits::Float;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Hard labels from a SymNMF factor: each point goes to the column with its largest membership
/// strength. Ties go to the lowest column index.
///
/// # Examples
/// ```
///use symnmf::{labels_from_factor, Matrix};
///
///let h = Matrix::from_rows(&[vec![0.9, 0.1], vec![0.2, 0.8], vec![0.5, 0.5]]).unwrap();
///assert_eq!(labels_from_factor(&h), vec![0, 1, 0]);
/// ```
pub fn labels_from_factor<T: Float>(h: &Matrix<T>) -> Vec<usize> {
    (0..h.rows())
        .map(|i| {
            let mut best = 0;
            let mut best_value = T::neg_infinity();
            for (j, &value) in h.row(i).iter().enumerate() {
                if value > best_value {
                    best_value = value;
                    best = j;
                }
            }
            best
        })
        .collect()
}

/// Hard labels from centroids: each point goes to its nearest centroid by Euclidean distance.
/// Ties go to the lowest centroid index.
///
/// # Returns
/// * One label per point, or `InvalidInput` if the points are inconsistent, there are no
///   centroids, or the centroid dimensionality differs from the points'.
pub fn labels_from_centroids<T: Float>(points: &[Vec<T>], centroids: &Matrix<T>) -> Result<Vec<usize>> {
    check_centroids(points, centroids)?;
    Ok(nearest_centroids(points, centroids))
}

#[cfg(feature = "parallel")]
pub fn labels_from_centroids_par<T: Float + Send + Sync>(
    points: &[Vec<T>],
    centroids: &Matrix<T>,
) -> Result<Vec<usize>> {
    check_centroids(points, centroids)?;
    Ok(nearest_centroids_par(points, centroids))
}

pub(crate) fn nearest_centroids<T: Float>(points: &[Vec<T>], centroids: &Matrix<T>) -> Vec<usize> {
    let candidates = centroid_rows(centroids);
    points
        .iter()
        .map(|point| nearest_row(point, &candidates))
        .collect()
}

#[cfg(feature = "parallel")]
pub(crate) fn nearest_centroids_par<T: Float + Send + Sync>(
    points: &[Vec<T>],
    centroids: &Matrix<T>,
) -> Vec<usize> {
    let candidates = centroid_rows(centroids);
    points
        .par_iter()
        .map(|point| nearest_row(point, &candidates))
        .collect()
}

fn centroid_rows<T: Float>(centroids: &Matrix<T>) -> Vec<&[T]> {
    (0..centroids.rows()).map(|c| centroids.row(c)).collect()
}

fn check_centroids<T: Float>(points: &[Vec<T>], centroids: &Matrix<T>) -> Result<()> {
    DataValidator::new(points).validate_input_data()?;
    if centroids.rows() == 0 {
        return Err(SymNmfError::InvalidInput(String::from(
            "At least one centroid is required",
        )));
    }
    let n_dims = points[0].len();
    if centroids.cols() != n_dims {
        return Err(SymNmfError::InvalidInput(format!(
            "Centroids have {} dimensions, but points have {n_dims}",
            centroids.cols()
        )));
    }
    Ok(())
}
