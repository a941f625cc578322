//! The k-means baseline (Lloyd's algorithm).
use crate::distance::{euclidean_distance, squared_euclidean_distance};
use crate::labels::nearest_centroids;
use crate::validation::DataValidator;
use crate::{KMeansHyperParams, KMeansInit, Matrix, Result};
use num_traits::Float;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

#[cfg(feature = "parallel")]
use crate::labels::nearest_centroids_par;

/// The output of a k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit<T> {
    /// The k x d centroid matrix. Row `c` is the centroid of cluster `c`.
    pub centroids: Matrix<T>,
    /// The nearest-centroid label of every point under the final centroids.
    pub labels: Vec<usize>,
    /// Number of Lloyd iterations performed.
    pub iterations: usize,
    /// Whether the run stopped because assignments (or centroids, with a tolerance) stopped
    /// changing rather than on `max_iter`.
    pub converged: bool,
}

/// Lloyd's k-means over a borrowed point set.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeans<'a, T> {
    data: &'a [Vec<T>],
    hp: KMeansHyperParams,
}

impl<'a, T: Float> KMeans<'a, T> {
    /// Creates a k-means model with custom hyper parameters.
    ///
    /// # Examples
    /// ```
    ///use symnmf::{KMeans, KMeansHyperParams, KMeansInit};
    ///
    ///let data: Vec<Vec<f64>> = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![10.0, 0.0]];
    ///let hp = KMeansHyperParams::builder()
    ///    .max_iter(50)
    ///    .init(KMeansInit::Random)
    ///    .build();
    ///let model = KMeans::new(&data, hp);
    /// ```
    pub fn new(data: &'a [Vec<T>], hyper_params: KMeansHyperParams) -> Self {
        KMeans {
            data,
            hp: hyper_params,
        }
    }

    pub fn default_hyper_params(data: &'a [Vec<T>]) -> KMeans<'a, T> {
        KMeans::new(data, KMeansHyperParams::default())
    }

    /// Runs Lloyd's algorithm for `k` clusters.
    ///
    /// # Parameters
    /// * `k` - the number of clusters, between 1 and the number of points.
    /// * `rng` - the random source for `KMeansInit::Random` and `KMeansInit::PlusPlus`. The
    ///   deterministic initializations ignore it.
    ///
    /// # Returns
    /// * The final centroids and labels, or `InvalidInput` if the point set is empty or
    ///   inconsistent or `k` is out of range.
    ///
    /// # Examples
    /// ```
    ///use rand::rngs::StdRng;
    ///use rand::SeedableRng;
    ///use symnmf::KMeans;
    ///
    ///let data: Vec<Vec<f64>> = vec![
    ///    vec![0.0, 0.0],
    ///    vec![0.0, 1.0],
    ///    vec![10.0, 0.0],
    ///    vec![10.0, 1.0],
    ///];
    ///let fit = KMeans::default_hyper_params(&data)
    ///    .fit(2, &mut StdRng::seed_from_u64(1234))
    ///    .unwrap();
    ///assert_eq!(fit.labels[0], fit.labels[1]);
    ///assert_eq!(fit.labels[2], fit.labels[3]);
    ///assert_ne!(fit.labels[0], fit.labels[2]);
    /// ```
    pub fn fit<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Result<KMeansFit<T>> {
        self.fit_with(k, rng, nearest_centroids)
    }

    /// As [`KMeans::fit`] with a generator seeded from `seed`.
    pub fn fit_seeded(&self, k: usize, seed: u64) -> Result<KMeansFit<T>> {
        self.fit(k, &mut StdRng::seed_from_u64(seed))
    }

    fn fit_with<R, A>(&self, k: usize, rng: &mut R, assign: A) -> Result<KMeansFit<T>>
    where
        R: Rng + ?Sized,
        A: Fn(&[Vec<T>], &Matrix<T>) -> Vec<usize>,
    {
        let validator = DataValidator::new(self.data);
        validator.validate_input_data()?;
        validator.validate_cluster_count(k)?;

        let tolerance = T::from(self.hp.tolerance).unwrap_or_else(T::zero);
        let mut centroids = self.init_centroids(k, rng)?;
        let mut labels: Option<Vec<usize>> = None;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.hp.max_iter {
            iterations += 1;
            let new_labels = assign(self.data, &centroids);
            let n_changed = match &labels {
                Some(old) => old.iter().zip(&new_labels).filter(|(a, b)| a != b).count(),
                None => self.data.len(),
            };
            trace!(iteration = iterations, n_changed, "k-means assignment");
            if n_changed == 0 {
                converged = true;
                break;
            }
            let new_centroids = self.calc_centroids(&new_labels, &centroids)?;
            let max_shift = max_centroid_shift(&centroids, &new_centroids);
            centroids = new_centroids;
            labels = Some(new_labels);
            if tolerance > T::zero() && max_shift < tolerance {
                converged = true;
                break;
            }
        }
        debug!(iterations, converged, "k-means finished");

        let labels = assign(self.data, &centroids);
        Ok(KMeansFit {
            centroids,
            labels,
            iterations,
            converged,
        })
    }

    fn init_centroids<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Result<Matrix<T>> {
        let indices = match self.hp.init {
            KMeansInit::Farthest => self.farthest_indices(k),
            KMeansInit::FirstDistinct => self.first_distinct_indices(k),
            KMeansInit::Random => rand::seq::index::sample(rng, self.data.len(), k).into_vec(),
            KMeansInit::PlusPlus => self.plus_plus_indices(k, rng),
        };
        let rows: Vec<Vec<T>> = indices.iter().map(|&i| self.data[i].clone()).collect();
        Matrix::from_rows(&rows)
    }

    fn farthest_indices(&self, k: usize) -> Vec<usize> {
        let mut chosen = vec![0];
        let mut min_dists: Vec<T> = self
            .data
            .iter()
            .map(|point| squared_euclidean_distance(point, &self.data[0]))
            .collect();
        while chosen.len() < k {
            let mut next = None;
            let mut max_dist = T::neg_infinity();
            for (i, &dist) in min_dists.iter().enumerate() {
                if !chosen.contains(&i) && dist > max_dist {
                    max_dist = dist;
                    next = Some(i);
                }
            }
            let Some(next) = next else { break };
            chosen.push(next);
            self.update_min_dists(&mut min_dists, next);
        }
        chosen
    }

    fn plus_plus_indices<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Vec<usize> {
        let first = rng.random_range(0..self.data.len());
        let mut chosen = vec![first];
        let mut min_dists: Vec<T> = self
            .data
            .iter()
            .map(|point| squared_euclidean_distance(point, &self.data[first]))
            .collect();
        while chosen.len() < k {
            let weights: Vec<f64> = min_dists
                .iter()
                .enumerate()
                .map(|(i, dist)| {
                    if chosen.contains(&i) { 0.0 } else { dist.to_f64().unwrap_or(0.0) }
                })
                .collect();
            let total: f64 = weights.iter().sum();
            let next = if total > 0.0 {
                let mut target = rng.random_range(0.0..total);
                let mut picked = None;
                for (i, &weight) in weights.iter().enumerate() {
                    if weight > 0.0 {
                        picked = Some(i);
                        if target < weight {
                            break;
                        }
                        target -= weight;
                    }
                }
                picked
            } else {
                // Every remaining point coincides with a centroid
                (0..self.data.len()).find(|i| !chosen.contains(i))
            };
            let Some(next) = next else { break };
            chosen.push(next);
            self.update_min_dists(&mut min_dists, next);
        }
        chosen
    }

    fn update_min_dists(&self, min_dists: &mut [T], centroid: usize) {
        for (dist, point) in min_dists.iter_mut().zip(self.data) {
            *dist = (*dist).min(squared_euclidean_distance(point, &self.data[centroid]));
        }
    }

    fn first_distinct_indices(&self, k: usize) -> Vec<usize> {
        let mut chosen: Vec<usize> = Vec::with_capacity(k);
        for (i, point) in self.data.iter().enumerate() {
            if chosen.len() == k {
                return chosen;
            }
            if chosen.iter().all(|&c| self.data[c] != *point) {
                chosen.push(i);
            }
        }
        if chosen.len() < k {
            warn!(
                n_distinct = chosen.len(),
                k, "fewer distinct points than clusters, reusing repeated points as centroids"
            );
            let fillers: Vec<usize> = (0..self.data.len())
                .filter(|i| !chosen.contains(i))
                .take(k - chosen.len())
                .collect();
            chosen.extend(fillers);
        }
        chosen
    }

    // A cluster that lost all of its points keeps its previous centroid.
    fn calc_centroids(&self, labels: &[usize], previous: &Matrix<T>) -> Result<Matrix<T>> {
        let (n_clusters, n_dims) = previous.shape();
        let mut sums = Matrix::zeros(n_clusters, n_dims);
        let mut counts = vec![0_usize; n_clusters];
        for (point, &label) in self.data.iter().zip(labels) {
            counts[label] += 1;
            for (sum, &element) in sums.row_mut(label).iter_mut().zip(point) {
                *sum = *sum + element;
            }
        }
        for (cluster_id, &count) in counts.iter().enumerate() {
            if count == 0 {
                warn!(cluster_id, "k-means cluster has no points, keeping its previous centroid");
                sums.row_mut(cluster_id).copy_from_slice(previous.row(cluster_id));
                continue;
            }
            let count = T::from(count).unwrap_or_else(T::one);
            for element in sums.row_mut(cluster_id).iter_mut() {
                *element = *element / count;
            }
        }
        Ok(sums)
    }
}

#[cfg(feature = "parallel")]
impl<'a, T: Float + Send + Sync> KMeans<'a, T> {
    /// As [`KMeans::fit`], with the nearest-centroid assignment computed in parallel.
    pub fn fit_par<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Result<KMeansFit<T>> {
        self.fit_with(k, rng, nearest_centroids_par)
    }
}

fn max_centroid_shift<T: Float>(old: &Matrix<T>, new: &Matrix<T>) -> T {
    (0..old.rows())
        .map(|c| euclidean_distance(old.row(c), new.row(c)))
        .fold(T::zero(), T::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_distinct_skips_duplicates() {
        let data = vec![vec![1.0], vec![1.0], vec![2.0], vec![3.0]];
        let model = KMeans::default_hyper_params(&data);
        assert_eq!(model.first_distinct_indices(2), vec![0, 2]);
    }

    #[test]
    fn first_distinct_fills_with_duplicates() {
        let data = vec![vec![1.0], vec![1.0], vec![1.0]];
        let model = KMeans::default_hyper_params(&data);
        assert_eq!(model.first_distinct_indices(2), vec![0, 1]);
    }

    #[test]
    fn farthest_picks_spread_out_points() {
        let data = vec![vec![0.0], vec![0.1], vec![5.0], vec![10.0], vec![10.1]];
        let model = KMeans::default_hyper_params(&data);
        assert_eq!(model.farthest_indices(3), vec![0, 4, 2]);
    }

    #[test]
    fn farthest_with_identical_points() {
        let data = vec![vec![1.0]; 3];
        let model = KMeans::default_hyper_params(&data);
        assert_eq!(model.farthest_indices(3), vec![0, 1, 2]);
    }

    #[test]
    fn plus_plus_indices_are_distinct() {
        let data = vec![vec![0.0], vec![0.0], vec![3.0], vec![7.0], vec![7.5]];
        let model = KMeans::default_hyper_params(&data);
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..20 {
            let mut indices = model.plus_plus_indices(5, &mut rng);
            indices.sort_unstable();
            assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn empty_cluster_keeps_previous_centroid() {
        let data = vec![vec![0.0], vec![1.0]];
        let model = KMeans::default_hyper_params(&data);
        let previous = Matrix::from_rows(&[vec![0.5], vec![100.0]]).unwrap();
        let centroids = model.calc_centroids(&[0, 0], &previous).unwrap();
        assert_eq!(centroids.to_rows(), vec![vec![0.5], vec![100.0]]);
    }

    #[test]
    fn one_dimensional_clusters() {
        let data = vec![vec![1.0], vec![1.5], vec![2.0], vec![8.0], vec![8.5], vec![9.0]];
        let fit = KMeans::default_hyper_params(&data).fit_seeded(2, 0).unwrap();
        assert!(fit.converged);
        assert_eq!(fit.labels, vec![0, 0, 0, 1, 1, 1]);
        assert_eq!(fit.centroids.to_rows(), vec![vec![1.5], vec![8.5]]);
    }
}
