use crate::graph::serial;
use crate::labels::labels_from_factor;
use crate::optimizer::{init_factor, Factorization, SymNmfOptimizer};
use crate::validation::DataValidator;
use crate::{Matrix, Result, SymNmfHyperParams};
use num_traits::Float;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use crate::graph::parallel;

/// Symmetric non-negative matrix factorization clustering. Generic over floating point numeric
/// types.
#[derive(Debug, Clone, PartialEq)]
pub struct SymNmf<'a, T> {
    data: &'a [Vec<T>],
    n_samples: usize,
    hp: SymNmfHyperParams,
}

impl<'a, T: Float> SymNmf<'a, T> {
    /// Creates a SymNMF model using a custom hyper parameter configuration.
    ///
    /// # Parameters
    /// * `data` - a reference to the points to cluster. The points must all be of the same
    ///            dimensionality and contain only finite values.
    /// * `hyper_params` - the optimizer configuration.
    ///
    /// # Returns
    /// * The SymNMF model instance.
    ///
    /// # Examples
    /// ```
    ///use symnmf::{SymNmf, SymNmfHyperParams};
    ///
    ///let data: Vec<Vec<f64>> = vec![
    ///    vec![0.0, 0.0],
    ///    vec![0.0, 1.0],
    ///    vec![10.0, 0.0],
    ///    vec![10.0, 1.0],
    ///];
    ///let config = SymNmfHyperParams::builder()
    ///    .max_iter(500)
    ///    .convergence_threshold(1e-6)
    ///    .build();
    ///let model = SymNmf::new(&data, config);
    /// ```
    pub fn new(data: &'a [Vec<T>], hyper_params: SymNmfHyperParams) -> Self {
        SymNmf {
            data,
            n_samples: data.len(),
            hp: hyper_params,
        }
    }

    /// Creates a SymNMF model using the default hyper parameters: at most 300 iterations, a
    /// convergence threshold of 1e-4, a stability epsilon of 1e-9 and a damping factor of 0.5.
    pub fn default_hyper_params(data: &'a [Vec<T>]) -> SymNmf<'a, T> {
        SymNmf::new(data, SymNmfHyperParams::default())
    }

    /// The similarity matrix `A`, with `A[i][j] = exp(-||x_i - x_j||^2 / 2)` and a zero diagonal.
    pub fn similarity(&self) -> Result<Matrix<T>> {
        DataValidator::new(self.data).validate_input_data()?;
        Ok(serial::similarity(self.data))
    }

    /// The diagonal degree matrix `D` of the similarity graph.
    pub fn degree(&self) -> Result<Matrix<T>> {
        let similarity = self.similarity()?;
        Ok(serial::degree(&similarity))
    }

    /// The normalized similarity matrix `W = D^(-1/2) A D^(-1/2)`.
    ///
    /// # Returns
    /// * `W`, or `DegenerateGraph` if some point has zero similarity to all the others.
    pub fn normalize(&self) -> Result<Matrix<T>> {
        let similarity = self.similarity()?;
        let degree = serial::degree(&similarity);
        serial::normalize(&similarity, &degree)
    }

    /// Factorizes the normalized similarity matrix into a non-negative n x k factor `H`.
    ///
    /// # Parameters
    /// * `k` - the number of clusters, between 1 and the number of points.
    /// * `rng` - the random source for the initial factor.
    ///
    /// # Returns
    /// * The final factor and iteration statistics, or an error if the input is invalid or the
    ///   similarity graph is degenerate.
    ///
    /// # Examples
    /// ```
    ///use rand::rngs::StdRng;
    ///use rand::SeedableRng;
    ///use symnmf::{labels_from_factor, SymNmf};
    ///
    ///let data: Vec<Vec<f64>> = vec![
    ///    vec![0.0, 0.0],
    ///    vec![0.0, 1.0],
    ///    vec![10.0, 0.0],
    ///    vec![10.0, 1.0],
    ///];
    ///let model = SymNmf::default_hyper_params(&data);
    ///let factorization = model.factorize(2, &mut StdRng::seed_from_u64(1234)).unwrap();
    ///assert_eq!(factorization.h.shape(), (4, 2));
    ///assert!(factorization.h.as_slice().iter().all(|&x| x >= 0.0));
    /// ```
    pub fn factorize<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Result<Factorization<T>> {
        let w = self.prepare_target(k)?;
        let h0 = init_factor(&w, k, rng)?;
        SymNmfOptimizer::new(self.hp.clone()).run(&w, h0)
    }

    /// As [`SymNmf::factorize`] with a generator seeded from `seed`.
    pub fn factorize_seeded(&self, k: usize, seed: u64) -> Result<Factorization<T>> {
        self.factorize(k, &mut StdRng::seed_from_u64(seed))
    }

    /// Factorizes and labels each point with the cluster of its largest membership strength.
    pub fn cluster<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Result<Vec<usize>> {
        let factorization = self.factorize(k, rng)?;
        Ok(labels_from_factor(&factorization.h))
    }

    fn prepare_target(&self, k: usize) -> Result<Matrix<T>> {
        let validator = DataValidator::new(self.data);
        validator.validate_input_data()?;
        validator.validate_cluster_count(k)?;
        self.warn_if_one_cluster_per_point(k);
        self.normalize()
    }

    fn warn_if_one_cluster_per_point(&self, k: usize) {
        if k == self.n_samples && k > 1 {
            warn!(k, "one cluster per point requested, the factorization will be degenerate");
        }
        debug!(n_samples = self.n_samples, k, "factorizing");
    }
}

#[cfg(feature = "parallel")]
impl<'a, T: Float + Send + Sync> SymNmf<'a, T> {
    pub fn similarity_par(&self) -> Result<Matrix<T>> {
        DataValidator::new(self.data).validate_input_data()?;
        Ok(parallel::similarity(self.data))
    }

    pub fn degree_par(&self) -> Result<Matrix<T>> {
        let similarity = self.similarity_par()?;
        Ok(parallel::degree(&similarity))
    }

    pub fn normalize_par(&self) -> Result<Matrix<T>> {
        let similarity = self.similarity_par()?;
        let degree = parallel::degree(&similarity);
        parallel::normalize(&similarity, &degree)
    }

    /// As [`SymNmf::factorize`], with the graph construction and matrix products computed in
    /// parallel. Given the same random source, the factor is identical to the serial one.
    pub fn factorize_par<R: Rng + ?Sized>(
        &self,
        k: usize,
        rng: &mut R,
    ) -> Result<Factorization<T>> {
        let validator = DataValidator::new(self.data);
        validator.validate_input_data()?;
        validator.validate_cluster_count(k)?;
        self.warn_if_one_cluster_per_point(k);
        let w = self.normalize_par()?;
        let h0 = init_factor(&w, k, rng)?;
        SymNmfOptimizer::new(self.hp.clone()).run_par(&w, h0)
    }

    pub fn cluster_par<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Result<Vec<usize>> {
        let factorization = self.factorize_par(k, rng)?;
        Ok(labels_from_factor(&factorization.h))
    }
}
