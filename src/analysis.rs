use crate::labels::labels_from_factor;
use crate::{
    silhouette_score, KMeans, KMeansHyperParams, Result, SymNmf, SymNmfHyperParams,
};
use num_traits::Float;
use rand::Rng;
use std::fmt::{Display, Formatter};
use tracing::debug;

#[cfg(feature = "parallel")]
use crate::silhouette_score_par;

/// Silhouette scores of the SymNMF clustering and the k-means baseline on the same points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisReport<T> {
    pub nmf: T,
    pub kmeans: T,
}

impl<T: Float> Display for AnalysisReport<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "nmf: {:.4}", self.nmf.to_f64().unwrap_or(f64::NAN))?;
        writeln!(f, "kmeans: {:.4}", self.kmeans.to_f64().unwrap_or(f64::NAN))
    }
}

/// Compares SymNMF against k-means for a fixed number of clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis<'a, T> {
    data: &'a [Vec<T>],
    k: usize,
    symnmf_hp: SymNmfHyperParams,
    kmeans_hp: KMeansHyperParams,
}

impl<'a, T: Float> Analysis<'a, T> {
    pub fn new(data: &'a [Vec<T>], k: usize) -> Self {
        Analysis {
            data,
            k,
            symnmf_hp: SymNmfHyperParams::default(),
            kmeans_hp: KMeansHyperParams::default(),
        }
    }

    pub fn symnmf_hyper_params(mut self, hyper_params: SymNmfHyperParams) -> Self {
        self.symnmf_hp = hyper_params;
        self
    }

    pub fn kmeans_hyper_params(mut self, hyper_params: KMeansHyperParams) -> Self {
        self.kmeans_hp = hyper_params;
        self
    }

    /// Clusters the points both ways and scores each labelling with the silhouette coefficient.
    /// The random source drives the SymNMF initialization, and the k-means initialization too
    /// when it is `KMeansInit::Random` or `KMeansInit::PlusPlus`.
    ///
    /// # Examples
    /// ```
    ///use rand::rngs::StdRng;
    ///use rand::SeedableRng;
    ///use symnmf::Analysis;
    ///
    ///let data: Vec<Vec<f64>> = vec![
    ///    vec![0.0, 0.0],
    ///    vec![0.0, 1.0],
    ///    vec![10.0, 0.0],
    ///    vec![10.0, 1.0],
    ///];
    ///let report = Analysis::new(&data, 2).run(&mut StdRng::seed_from_u64(1234)).unwrap();
    ///assert!(report.kmeans > 0.85);
    /// ```
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<AnalysisReport<T>> {
        let kmeans_labels = KMeans::new(self.data, self.kmeans_hp.clone())
            .fit(self.k, rng)?
            .labels;
        let factorization = SymNmf::new(self.data, self.symnmf_hp.clone()).factorize(self.k, rng)?;
        let nmf_labels = labels_from_factor(&factorization.h);
        let report = AnalysisReport {
            nmf: silhouette_score(self.data, &nmf_labels)?,
            kmeans: silhouette_score(self.data, &kmeans_labels)?,
        };
        debug!(
            nmf = report.nmf.to_f64(),
            kmeans = report.kmeans.to_f64(),
            "analysis finished"
        );
        Ok(report)
    }
}

#[cfg(feature = "parallel")]
impl<'a, T: Float + Send + Sync> Analysis<'a, T> {
    pub fn run_par<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<AnalysisReport<T>> {
        let kmeans_labels = KMeans::new(self.data, self.kmeans_hp.clone())
            .fit_par(self.k, rng)?
            .labels;
        let factorization =
            SymNmf::new(self.data, self.symnmf_hp.clone()).factorize_par(self.k, rng)?;
        let nmf_labels = labels_from_factor(&factorization.h);
        Ok(AnalysisReport {
            nmf: silhouette_score_par(self.data, &nmf_labels)?,
            kmeans: silhouette_score_par(self.data, &kmeans_labels)?,
        })
    }
}
