use tracing::warn;

// Defaults for parameters
const MAX_ITER_DEFAULT: usize = 300;
const CONVERGENCE_THRESHOLD_DEFAULT: f64 = 1e-4;
const STABILITY_EPSILON_DEFAULT: f64 = 1e-9;
const BETA_DEFAULT: f64 = 0.5;
const KMEANS_INIT_DEFAULT: KMeansInit = KMeansInit::Farthest;
const KMEANS_TOLERANCE_DEFAULT: f64 = 0.0;

// Valid minimums/bounds of parameters
const MAX_ITER_MINIMUM: usize = 1;
const BETA_MAXIMUM: f64 = 1.0;

/// The hyper parameters of the SymNMF multiplicative update iteration.
/// Only use if you want to tune the optimizer. Otherwise use `SymNmf::default_hyper_params()`.
#[derive(Debug, Clone, PartialEq)]
pub struct SymNmfHyperParams {
    pub(crate) max_iter: usize,
    pub(crate) convergence_threshold: f64,
    pub(crate) stability_epsilon: f64,
    pub(crate) beta: f64,
}

/// Builder object to set custom SymNMF hyper parameters.
pub struct SymNmfHyperParamBuilder {
    max_iter: Option<usize>,
    convergence_threshold: Option<f64>,
    stability_epsilon: Option<f64>,
    beta: Option<f64>,
}

impl Default for SymNmfHyperParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SymNmfHyperParams {
    /// Enters the builder pattern, allowing custom hyper parameters to be set using
    /// various setter methods.
    ///
    /// # Returns
    /// * the hyper parameter configuration builder
    pub fn builder() -> SymNmfHyperParamBuilder {
        SymNmfHyperParamBuilder {
            max_iter: None,
            convergence_threshold: None,
            stability_epsilon: None,
            beta: None,
        }
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn convergence_threshold(&self) -> f64 {
        self.convergence_threshold
    }

    pub fn stability_epsilon(&self) -> f64 {
        self.stability_epsilon
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl SymNmfHyperParamBuilder {
    /// Sets the maximum number of multiplicative updates. Defaults to 300.
    ///
    /// # Parameters
    /// * max_iter - the iteration cap, at least 1
    ///
    /// # Returns
    /// * the hyper parameter configuration builder
    pub fn max_iter(mut self, max_iter: usize) -> SymNmfHyperParamBuilder {
        let valid_max_iter = validate_input_left_bound(max_iter, MAX_ITER_MINIMUM, "max_iter");
        self.max_iter = Some(valid_max_iter);
        self
    }

    /// Sets the convergence threshold. Iteration stops once the squared Frobenius norm of the
    /// change in H between two consecutive updates falls below this value. Defaults to 1e-4.
    ///
    /// # Parameters
    /// * convergence_threshold - a strictly positive threshold
    ///
    /// # Returns
    /// * the hyper parameter configuration builder
    pub fn convergence_threshold(mut self, convergence_threshold: f64) -> SymNmfHyperParamBuilder {
        let valid = validate_positive(
            convergence_threshold,
            CONVERGENCE_THRESHOLD_DEFAULT,
            "convergence_threshold",
        );
        self.convergence_threshold = Some(valid);
        self
    }

    /// Sets the small constant added to the denominator `H·Hᵀ·H` of the update ratio, which keeps
    /// the ratio finite when an entry of the denominator is exactly zero. Defaults to 1e-9.
    ///
    /// # Parameters
    /// * stability_epsilon - a non-negative constant
    ///
    /// # Returns
    /// * the hyper parameter configuration builder
    pub fn stability_epsilon(mut self, stability_epsilon: f64) -> SymNmfHyperParamBuilder {
        let valid = if stability_epsilon.is_finite() && stability_epsilon >= 0.0 {
            stability_epsilon
        } else {
            warn!(
                "stability_epsilon ({stability_epsilon}) must be finite and non-negative. \
                Set to {STABILITY_EPSILON_DEFAULT}."
            );
            STABILITY_EPSILON_DEFAULT
        };
        self.stability_epsilon = Some(valid);
        self
    }

    /// Sets the damping factor of the update,
    /// `H <- H * (1 - beta + beta * (W·H) / (H·Hᵀ·H + epsilon))`.
    /// A beta of 1 applies the plain multiplicative update. Defaults to 0.5.
    ///
    /// # Parameters
    /// * beta - a damping factor in (0, 1]
    ///
    /// # Returns
    /// * the hyper parameter configuration builder
    pub fn beta(mut self, beta: f64) -> SymNmfHyperParamBuilder {
        let valid = if beta > BETA_MAXIMUM {
            warn!("beta ({beta}) cannot be greater than {BETA_MAXIMUM}. Set to {BETA_MAXIMUM}.");
            BETA_MAXIMUM
        } else {
            validate_positive(beta, BETA_DEFAULT, "beta")
        };
        self.beta = Some(valid);
        self
    }

    /// Finishes the building of the hyper parameter configuration.
    ///
    /// # Returns
    /// * The completed SymNMF hyper parameter configuration.
    pub fn build(self) -> SymNmfHyperParams {
        SymNmfHyperParams {
            max_iter: self.max_iter.unwrap_or(MAX_ITER_DEFAULT),
            convergence_threshold: self
                .convergence_threshold
                .unwrap_or(CONVERGENCE_THRESHOLD_DEFAULT),
            stability_epsilon: self.stability_epsilon.unwrap_or(STABILITY_EPSILON_DEFAULT),
            beta: self.beta.unwrap_or(BETA_DEFAULT),
        }
    }
}

/// How the k-means baseline picks its initial centroids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KMeansInit {
    /// Deterministic farthest-point seeding: the first point, then repeatedly the point whose
    /// distance to its nearest chosen centroid is largest. Ties go to the lowest index.
    Farthest,
    /// The first k pairwise distinct points in input order. If the data has fewer than k
    /// distinct points, the remaining centroids are the earliest repeated points.
    FirstDistinct,
    /// k distinct point indices drawn uniformly from the random number generator passed to
    /// `KMeans::fit`.
    Random,
    /// k-means++: the first centroid uniformly, each further one with probability proportional
    /// to its squared distance from the nearest centroid chosen so far.
    PlusPlus,
}

/// The hyper parameters of the k-means baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansHyperParams {
    pub(crate) max_iter: usize,
    pub(crate) init: KMeansInit,
    pub(crate) tolerance: f64,
}

/// Builder object to set custom k-means hyper parameters.
pub struct KMeansHyperParamBuilder {
    max_iter: Option<usize>,
    init: Option<KMeansInit>,
    tolerance: Option<f64>,
}

impl Default for KMeansHyperParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl KMeansHyperParams {
    pub fn builder() -> KMeansHyperParamBuilder {
        KMeansHyperParamBuilder {
            max_iter: None,
            init: None,
            tolerance: None,
        }
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn init(&self) -> KMeansInit {
        self.init
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl KMeansHyperParamBuilder {
    /// Sets the maximum number of Lloyd iterations. Defaults to 300.
    pub fn max_iter(mut self, max_iter: usize) -> KMeansHyperParamBuilder {
        let valid_max_iter = validate_input_left_bound(max_iter, MAX_ITER_MINIMUM, "max_iter");
        self.max_iter = Some(valid_max_iter);
        self
    }

    /// Sets the centroid initialization strategy. Defaults to `KMeansInit::Farthest`.
    pub fn init(mut self, init: KMeansInit) -> KMeansHyperParamBuilder {
        self.init = Some(init);
        self
    }

    /// Sets an additional early stop: iteration ends once no centroid moved further than this
    /// Euclidean distance. Defaults to 0, which disables the check so that iteration only ends
    /// when no assignment changes or `max_iter` is reached.
    pub fn tolerance(mut self, tolerance: f64) -> KMeansHyperParamBuilder {
        let valid = if tolerance.is_finite() && tolerance >= 0.0 {
            tolerance
        } else {
            warn!("tolerance ({tolerance}) must be finite and non-negative. Set to 0.");
            KMEANS_TOLERANCE_DEFAULT
        };
        self.tolerance = Some(valid);
        self
    }

    pub fn build(self) -> KMeansHyperParams {
        KMeansHyperParams {
            max_iter: self.max_iter.unwrap_or(MAX_ITER_DEFAULT),
            init: self.init.unwrap_or(KMEANS_INIT_DEFAULT),
            tolerance: self.tolerance.unwrap_or(KMEANS_TOLERANCE_DEFAULT),
        }
    }
}

fn validate_input_left_bound(input_param: usize, left_bound: usize, param: &str) -> usize {
    if input_param < left_bound {
        warn!("{param} ({input_param}) cannot be lower than {left_bound}. Set to {left_bound}.");
        left_bound
    } else {
        input_param
    }
}

fn validate_positive(input_param: f64, default: f64, param: &str) -> f64 {
    if input_param.is_finite() && input_param > 0.0 {
        input_param
    } else {
        warn!("{param} ({input_param}) must be finite and positive. Set to {default}.");
        default
    }
}
