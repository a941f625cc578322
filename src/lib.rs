//! Symmetric Non-negative Matrix Factorization ("SymNMF") clustering in Rust, with a k-means
//! baseline and silhouette scoring. Generic over floating point numeric types.
//!
//! SymNMF clusters points through their similarity graph:
//!  1. A Gaussian similarity matrix `A[i][j] = exp(-||x_i - x_j||^2 / 2)` is built over all pairs
//!     of points, with a zero diagonal;
//!  2. it is normalized by the point degrees, `W = D^(-1/2) A D^(-1/2)`; and
//!  3. `W` is factorized as `H·Hᵀ` with `H` (n x k) non-negative, using damped multiplicative
//!     updates. Row `i` of `H` holds the membership strengths of point `i`, and its largest
//!     entry gives the point's cluster.
//!
//! The same points can be clustered with Lloyd's k-means, and both labellings scored with the
//! silhouette coefficient to compare them.
//!
//! Randomized steps take their random number generator as an argument, so runs are reproducible
//! from a seed.
//!
//! # Examples
//! ```
//!use rand::rngs::StdRng;
//!use rand::SeedableRng;
//!use symnmf::{silhouette_score, SymNmf};
//!
//!let data: Vec<Vec<f64>> = vec![
//!    vec![0.0, 0.0],
//!    vec![0.0, 1.0],
//!    vec![10.0, 0.0],
//!    vec![10.0, 1.0],
//!];
//!let model = SymNmf::default_hyper_params(&data);
//!let labels = model.cluster(2, &mut StdRng::seed_from_u64(1234)).unwrap();
//!assert_eq!(labels[0], labels[1]);
//!assert_eq!(labels[2], labels[3]);
//!assert_ne!(labels[0], labels[2]);
//!assert!(silhouette_score(&data, &labels).unwrap() > 0.85);
//! ```
//!
//! # References
//! * [Kuang, D.; Ding, C.; Park, H. Symmetric Nonnegative Matrix Factorization for Graph Clustering.](https://doi.org/10.1137/1.9781611972825.10)
//! * [Rousseeuw, P.J. Silhouettes: a graphical aid to the interpretation and validation of cluster analysis.](https://doi.org/10.1016/0377-0427(87)90125-7)

pub use crate::analysis::{Analysis, AnalysisReport};
pub use crate::error::{Result, SymNmfError};
pub use crate::graph::{degree_matrix, normalized_similarity, similarity_matrix};
pub use crate::hyper_parameters::{
    KMeansHyperParamBuilder, KMeansHyperParams, KMeansInit, SymNmfHyperParamBuilder,
    SymNmfHyperParams,
};
pub use crate::kmeans::{KMeans, KMeansFit};
pub use crate::labels::{labels_from_centroids, labels_from_factor};
pub use crate::matrix::Matrix;
pub use crate::optimizer::{init_factor, objective, Factorization, SymNmfOptimizer};
pub use crate::silhouette::{silhouette_score, UNDEFINED_SILHOUETTE};
pub use crate::symnmf::SymNmf;

#[cfg(feature = "parallel")]
pub use crate::graph::{degree_matrix_par, normalized_similarity_par, similarity_matrix_par};
#[cfg(feature = "parallel")]
pub use crate::labels::labels_from_centroids_par;
#[cfg(feature = "parallel")]
pub use crate::silhouette::silhouette_score_par;

mod analysis;
mod distance;
mod error;
mod graph;
mod hyper_parameters;
pub mod io;
mod kmeans;
mod labels;
mod matrix;
mod optimizer;
mod silhouette;
mod symnmf;
mod validation;
