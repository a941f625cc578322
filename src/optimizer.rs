//! The SymNMF multiplicative update iteration.
//!
//! Given a symmetric non-negative matrix `W` (n x n), the optimizer looks for a non-negative
//! `H` (n x k) minimizing `||W - H·Hᵀ||²_F`. Every iteration applies, entry-wise,
//!
//! `H <- H * (1 - beta + beta * (W·H) / (H·Hᵀ·H + epsilon))`
//!
//! which keeps `H` non-negative because every factor is non-negative. Iteration stops after
//! `max_iter` updates, or as soon as the squared Frobenius norm of the change in `H` falls below
//! the convergence threshold.
use crate::{Matrix, Result, SymNmfError, SymNmfHyperParams};
use num_traits::Float;
use rand::distr::{Distribution, Uniform};
use rand::Rng;
use tracing::{debug, enabled, trace, Level};

/// The output of a SymNMF run.
#[derive(Debug, Clone, PartialEq)]
pub struct Factorization<T> {
    /// The n x k non-negative factor. Row `i` holds the membership strength of point `i` in each
    /// of the k clusters.
    pub h: Matrix<T>,
    /// Number of updates applied.
    pub iterations: usize,
    /// Whether the run stopped on the convergence threshold rather than on `max_iter`.
    pub converged: bool,
}

/// Draws the initial factor `H₀` (n x k) with entries uniform on `[0, 2·sqrt(m / k)]`, where `m`
/// is the mean of all entries of `W`. This puts `H₀·H₀ᵀ` on the same scale as `W`.
///
/// # Examples
/// ```
///use rand::rngs::StdRng;
///use rand::SeedableRng;
///use symnmf::{init_factor, Matrix};
///
///let w = Matrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
///let mut rng = StdRng::seed_from_u64(1234);
///let h = init_factor(&w, 2, &mut rng).unwrap();
///assert_eq!(h.shape(), (2, 2));
///assert!(h.as_slice().iter().all(|&x| (0.0..=1.0).contains(&x)));
/// ```
pub fn init_factor<T, R>(w: &Matrix<T>, k: usize, rng: &mut R) -> Result<Matrix<T>>
where
    T: Float,
    R: Rng + ?Sized,
{
    check_target(w)?;
    if k == 0 {
        return Err(SymNmfError::InvalidFactorizationInput(String::from(
            "The number of clusters must be at least 1",
        )));
    }
    let mean = w.mean().to_f64().unwrap_or(0.0);
    let upper_bound = 2.0 * (mean / k as f64).sqrt();
    let uniform = Uniform::new_inclusive(0.0, upper_bound).map_err(|e| {
        SymNmfError::InvalidFactorizationInput(format!(
            "Cannot sample initial factor on [0, {upper_bound}]: {e}"
        ))
    })?;
    let data = (0..w.rows() * k)
        .map(|_| to_float(uniform.sample(rng)))
        .collect();
    Matrix::from_vec(w.rows(), k, data)
}

/// The SymNMF objective `||W - H·Hᵀ||²_F`.
pub fn objective<T: Float>(w: &Matrix<T>, h: &Matrix<T>) -> Result<T> {
    let reconstruction = h.matmul(&h.transpose())?;
    w.squared_frobenius_distance(&reconstruction)
}

/// Runs the multiplicative update iteration on a normalized similarity matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct SymNmfOptimizer {
    hp: SymNmfHyperParams,
}

impl SymNmfOptimizer {
    pub fn new(hyper_params: SymNmfHyperParams) -> Self {
        SymNmfOptimizer { hp: hyper_params }
    }

    pub fn hyper_params(&self) -> &SymNmfHyperParams {
        &self.hp
    }

    /// Iterates from `h0` until convergence or `max_iter` updates.
    ///
    /// # Parameters
    /// * `w` - the n x n normalized similarity matrix.
    /// * `h0` - the n x k non-negative initial factor.
    ///
    /// # Returns
    /// * The final factor together with the iteration count and stopping reason, or
    ///   `InvalidFactorizationInput` if the shapes of `w` and `h0` disagree, `h0` has no
    ///   columns, or `h0` has negative or non-finite entries.
    pub fn run<T: Float>(&self, w: &Matrix<T>, h0: Matrix<T>) -> Result<Factorization<T>> {
        self.validate(w, &h0)?;
        self.iterate(w, h0, |a, b| a.matmul(b))
    }

    /// Applies a single multiplicative update to `h`.
    pub fn step<T: Float>(&self, w: &Matrix<T>, h: &Matrix<T>) -> Result<Matrix<T>> {
        self.validate(w, h)?;
        self.update(w, h, |a, b| a.matmul(b))
    }

    fn iterate<T, F>(&self, w: &Matrix<T>, h0: Matrix<T>, matmul: F) -> Result<Factorization<T>>
    where
        T: Float,
        F: Fn(&Matrix<T>, &Matrix<T>) -> Result<Matrix<T>>,
    {
        let threshold: T = to_float(self.hp.convergence_threshold);
        let mut h = h0;
        for iteration in 1..=self.hp.max_iter {
            let next = self.update(w, &h, &matmul)?;
            let delta = next.squared_frobenius_distance(&h)?;
            h = next;
            if enabled!(Level::TRACE) {
                let loss = objective(w, &h)?.to_f64();
                trace!(iteration, delta = delta.to_f64(), loss, "symnmf update");
            }
            if delta < threshold {
                debug!(iteration, "symnmf converged");
                return Ok(Factorization {
                    h,
                    iterations: iteration,
                    converged: true,
                });
            }
        }
        debug!(max_iter = self.hp.max_iter, "symnmf reached max_iter");
        Ok(Factorization {
            h,
            iterations: self.hp.max_iter,
            converged: false,
        })
    }

    fn update<T, F>(&self, w: &Matrix<T>, h: &Matrix<T>, matmul: F) -> Result<Matrix<T>>
    where
        T: Float,
        F: Fn(&Matrix<T>, &Matrix<T>) -> Result<Matrix<T>>,
    {
        let beta: T = to_float(self.hp.beta);
        let epsilon: T = to_float(self.hp.stability_epsilon);
        let damping = T::one() - beta;

        let wh = matmul(w, h)?;
        // H·(Hᵀ·H) is n x k like H·Hᵀ·H, but only needs a k x k intermediate.
        let hth = matmul(&h.transpose(), h)?;
        let hhth = matmul(h, &hth)?;

        let mut next = Matrix::zeros(h.rows(), h.cols());
        for (((out, &h_ij), &num), &den) in next
            .as_mut_slice()
            .iter_mut()
            .zip(h.as_slice())
            .zip(wh.as_slice())
            .zip(hhth.as_slice())
        {
            *out = h_ij * (damping + beta * num / (den + epsilon));
        }
        Ok(next)
    }

    fn validate<T: Float>(&self, w: &Matrix<T>, h: &Matrix<T>) -> Result<()> {
        check_target(w)?;
        if h.rows() != w.rows() {
            return Err(SymNmfError::InvalidFactorizationInput(format!(
                "H has {} rows but W is {}x{}",
                h.rows(),
                w.rows(),
                w.cols()
            )));
        }
        if h.cols() == 0 {
            return Err(SymNmfError::InvalidFactorizationInput(String::from(
                "H must have at least one column",
            )));
        }
        if h.as_slice().iter().any(|&x| !x.is_finite() || x < T::zero()) {
            return Err(SymNmfError::InvalidFactorizationInput(String::from(
                "H must be finite and non-negative",
            )));
        }
        Ok(())
    }
}

#[cfg(feature = "parallel")]
impl SymNmfOptimizer {
    /// As [`SymNmfOptimizer::run`], with the matrix products computed in parallel. The result is
    /// identical to the serial run.
    pub fn run_par<T: Float + Send + Sync>(
        &self,
        w: &Matrix<T>,
        h0: Matrix<T>,
    ) -> Result<Factorization<T>> {
        self.validate(w, &h0)?;
        self.iterate(w, h0, |a, b| a.matmul_par(b))
    }

    pub fn step_par<T: Float + Send + Sync>(&self, w: &Matrix<T>, h: &Matrix<T>) -> Result<Matrix<T>> {
        self.validate(w, h)?;
        self.update(w, h, |a, b| a.matmul_par(b))
    }
}

fn check_target<T: Float>(w: &Matrix<T>) -> Result<()> {
    if !w.is_square() || w.rows() == 0 {
        return Err(SymNmfError::InvalidFactorizationInput(format!(
            "W must be square and non-empty, got {}x{}",
            w.rows(),
            w.cols()
        )));
    }
    Ok(())
}

fn to_float<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}
