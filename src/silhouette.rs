//! Silhouette coefficient of a labelling.
//!
//! For point `i`, `a(i)` is its mean distance to the other members of its own cluster and `b(i)`
//! is the smallest mean distance from `i` to the members of any other cluster. The point's score
//! is `(b(i) - a(i)) / max(a(i), b(i))`, or 0 if `i` is alone in its cluster. The overall score
//! is the mean over all points.
use crate::distance::euclidean_distance;
use crate::validation::DataValidator;
use crate::Result;
use num_traits::Float;
use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Returned when fewer than two distinct labels are present and the silhouette is undefined.
pub const UNDEFINED_SILHOUETTE: f64 = -1.0;

/// Scores a labelling of `points`.
///
/// # Parameters
/// * `points` - the clustered points.
/// * `labels` - one label per point. Labels need not be contiguous.
///
/// # Returns
/// * The mean silhouette coefficient in [-1, 1], or exactly -1 when only one distinct label is
///   present. `InvalidInput` if the points are inconsistent or the label count differs from the
///   point count.
///
/// # Examples
/// ```
///use symnmf::silhouette_score;
///
///let points: Vec<Vec<f64>> = vec![
///    vec![0.0, 0.0],
///    vec![0.0, 1.0],
///    vec![10.0, 0.0],
///    vec![10.0, 1.0],
///];
///let score = silhouette_score(&points, &[0, 0, 1, 1]).unwrap();
///assert!(score > 0.85);
///assert_eq!(silhouette_score(&points, &[3, 3, 3, 3]).unwrap(), -1.0);
/// ```
pub fn silhouette_score<T: Float>(points: &[Vec<T>], labels: &[usize]) -> Result<T> {
    let clusters = match ClusterIndex::new(points, labels)? {
        Some(clusters) => clusters,
        None => return Ok(undefined()),
    };
    let total = (0..points.len())
        .map(|i| clusters.point_silhouette(points, i))
        .fold(T::zero(), std::ops::Add::add);
    Ok(clusters.mean(total))
}

/// As [`silhouette_score`], with per-point coefficients computed in parallel and summed in point
/// order, which gives the same result as the serial version.
#[cfg(feature = "parallel")]
pub fn silhouette_score_par<T: Float + Send + Sync>(points: &[Vec<T>], labels: &[usize]) -> Result<T> {
    let clusters = match ClusterIndex::new(points, labels)? {
        Some(clusters) => clusters,
        None => return Ok(undefined()),
    };
    let scores: Vec<T> = (0..points.len())
        .into_par_iter()
        .map(|i| clusters.point_silhouette(points, i))
        .collect();
    let total = scores.into_iter().fold(T::zero(), std::ops::Add::add);
    Ok(clusters.mean(total))
}

fn undefined<T: Float>() -> T {
    T::from(UNDEFINED_SILHOUETTE).unwrap_or_else(|| -T::one())
}

/// Labels remapped to dense cluster ids, plus cluster sizes.
struct ClusterIndex {
    dense_labels: Vec<usize>,
    sizes: Vec<usize>,
}

impl ClusterIndex {
    fn new<T: Float>(points: &[Vec<T>], labels: &[usize]) -> Result<Option<Self>> {
        let validator = DataValidator::new(points);
        validator.validate_input_data()?;
        validator.validate_labels(labels)?;

        let mut ids: BTreeMap<usize, usize> = BTreeMap::new();
        for &label in labels {
            let next_id = ids.len();
            ids.entry(label).or_insert(next_id);
        }
        if ids.len() < 2 {
            return Ok(None);
        }
        let dense_labels: Vec<usize> = labels.iter().map(|label| ids[label]).collect();
        let mut sizes = vec![0; ids.len()];
        dense_labels.iter().for_each(|&id| sizes[id] += 1);
        Ok(Some(ClusterIndex {
            dense_labels,
            sizes,
        }))
    }

    fn point_silhouette<T: Float>(&self, points: &[Vec<T>], i: usize) -> T {
        let own = self.dense_labels[i];
        if self.sizes[own] == 1 {
            return T::zero();
        }
        let mut sums = vec![T::zero(); self.sizes.len()];
        for (j, other) in points.iter().enumerate() {
            if j != i {
                let id = self.dense_labels[j];
                sums[id] = sums[id] + euclidean_distance(&points[i], other);
            }
        }
        let a = sums[own] / count(self.sizes[own] - 1);
        let b = sums
            .iter()
            .zip(&self.sizes)
            .enumerate()
            .filter(|(id, _)| *id != own)
            .map(|(_, (&sum, &size))| sum / count(size))
            .fold(T::infinity(), T::min);
        let scale = a.max(b);
        if scale > T::zero() {
            (b - a) / scale
        } else {
            T::zero()
        }
    }

    fn mean<T: Float>(&self, total: T) -> T {
        total / count(self.dense_labels.len())
    }
}

fn count<T: Float>(n: usize) -> T {
    T::from(n).unwrap_or_else(T::one)
}
