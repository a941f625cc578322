//! Construction of the pairwise similarity graph and its degree normalization.
//!
//! For points `x_i`, the similarity matrix is `A[i][j] = exp(-||x_i - x_j||^2 / 2)` off the
//! diagonal and zero on it. The degree matrix `D` is diagonal with the row sums of `A`, and the
//! normalized similarity is `W = D^(-1/2) A D^(-1/2)`.
use crate::distance::squared_euclidean_distance;
use crate::validation::DataValidator;
use crate::{Matrix, Result, SymNmfError};
use num_traits::Float;

#[cfg(feature = "parallel")]
pub(crate) mod parallel;
pub(crate) mod serial;

/// Builds the similarity matrix `A` of a point set.
///
/// # Parameters
/// * `points` - n points of equal, non-zero dimensionality with finite coordinates.
///
/// # Returns
/// * The symmetric n x n similarity matrix with a zero diagonal, or `InvalidInput` if the point
///   set is empty or inconsistent.
///
/// # Examples
/// ```
///use symnmf::similarity_matrix;
///
///let points = vec![vec![0.0, 0.0], vec![0.0, 1.0]];
///let a = similarity_matrix(&points).unwrap();
///assert_eq!(a[(0, 0)], 0.0);
///assert!((a[(0, 1)] - (-0.5_f64).exp()).abs() < 1e-12);
/// ```
pub fn similarity_matrix<T: Float>(points: &[Vec<T>]) -> Result<Matrix<T>> {
    DataValidator::new(points).validate_input_data()?;
    Ok(serial::similarity(points))
}

/// Builds the diagonal degree matrix `D` from a similarity matrix. `D[i][i]` is the sum of row
/// `i` of `A`. Fails with `InvalidInput` when `A` is not square.
pub fn degree_matrix<T: Float>(similarity: &Matrix<T>) -> Result<Matrix<T>> {
    check_square(similarity)?;
    Ok(serial::degree(similarity))
}

/// Builds `W = D^(-1/2) A D^(-1/2)` from a similarity matrix.
///
/// Fails with `DegenerateGraph` if any point has zero degree. That point has zero similarity
/// to every other point, so its inverse square root degree does not exist.
pub fn normalized_similarity<T: Float>(similarity: &Matrix<T>) -> Result<Matrix<T>> {
    let degree = degree_matrix(similarity)?;
    serial::normalize(similarity, &degree)
}

#[cfg(feature = "parallel")]
pub fn similarity_matrix_par<T: Float + Send + Sync>(points: &[Vec<T>]) -> Result<Matrix<T>> {
    DataValidator::new(points).validate_input_data()?;
    Ok(parallel::similarity(points))
}

#[cfg(feature = "parallel")]
pub fn degree_matrix_par<T: Float + Send + Sync>(similarity: &Matrix<T>) -> Result<Matrix<T>> {
    check_square(similarity)?;
    Ok(parallel::degree(similarity))
}

#[cfg(feature = "parallel")]
pub fn normalized_similarity_par<T: Float + Send + Sync>(
    similarity: &Matrix<T>,
) -> Result<Matrix<T>> {
    let degree = degree_matrix_par(similarity)?;
    parallel::normalize(similarity, &degree)
}

pub(crate) fn gaussian_similarity<T: Float>(a: &[T], b: &[T]) -> T {
    let two = T::one() + T::one();
    (-squared_euclidean_distance(a, b) / two).exp()
}

pub(crate) fn row_degree<T: Float>(row: &[T]) -> T {
    row.iter().fold(T::zero(), |acc, &x| acc + x)
}

/// `1 / sqrt(D[i][i])` for every point.
pub(crate) fn inverse_sqrt_degrees<T: Float>(degree: &Matrix<T>) -> Result<Vec<T>> {
    (0..degree.rows())
        .map(|i| {
            let d = degree[(i, i)];
            if d <= T::zero() {
                Err(SymNmfError::DegenerateGraph { index: i })
            } else {
                Ok(T::one() / d.sqrt())
            }
        })
        .collect()
}

// The product of the two scale factors is formed first so W[i][j] and W[j][i] are bit-identical.
pub(crate) fn normalize_row<T: Float>(
    similarity_row: &[T],
    inv_sqrt: &[T],
    i: usize,
    out_row: &mut [T],
) {
    for (j, (out, &a)) in out_row.iter_mut().zip(similarity_row).enumerate() {
        *out = a * (inv_sqrt[i] * inv_sqrt[j]);
    }
}

fn check_square<T: Float>(matrix: &Matrix<T>) -> Result<()> {
    if !matrix.is_square() || matrix.rows() == 0 {
        return Err(SymNmfError::InvalidInput(format!(
            "Similarity matrix must be square and non-empty, got {}x{}",
            matrix.rows(),
            matrix.cols()
        )));
    }
    Ok(())
}
