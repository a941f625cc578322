#![allow(dead_code)]
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use symnmf::{
    labels_from_factor, Factorization, KMeans, KMeansFit, KMeansHyperParams, KMeansInit, Matrix,
    Result, SymNmf, SymNmfError, SymNmfHyperParams,
};

/// One execution strategy (serial or parallel) for every stage of the pipeline.
pub struct Backend {
    pub similarity: fn(&SymNmf<f64>) -> Result<Matrix<f64>>,
    pub degree: fn(&SymNmf<f64>) -> Result<Matrix<f64>>,
    pub normalize: fn(&SymNmf<f64>) -> Result<Matrix<f64>>,
    pub factorize: fn(&SymNmf<f64>, usize, &mut StdRng) -> Result<Factorization<f64>>,
    pub kmeans: fn(&KMeans<f64>, usize, &mut StdRng) -> Result<KMeansFit<f64>>,
    pub silhouette: fn(&[Vec<f64>], &[usize]) -> Result<f64>,
}

pub fn two_pairs() -> Vec<Vec<f64>> {
    vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![10.0, 0.0],
        vec![10.0, 1.0],
    ]
}

/// Three tight groups of five points around (0, 0), (6, 0) and (3, 6).
pub fn three_blobs() -> Vec<Vec<f64>> {
    let offsets = [(0.0, 0.0), (0.3, 0.1), (-0.2, 0.3), (0.1, -0.3), (-0.3, -0.1)];
    let centers = [(0.0, 0.0), (6.0, 0.0), (3.0, 6.0)];
    centers
        .iter()
        .flat_map(|&(cx, cy)| offsets.iter().map(move |&(dx, dy)| vec![cx + dx, cy + dy]))
        .collect()
}

pub fn tight_symnmf_params() -> SymNmfHyperParams {
    SymNmfHyperParams::builder()
        .max_iter(1000)
        .convergence_threshold(1e-10)
        .build()
}

fn n_unique(labels: &[usize]) -> usize {
    labels.iter().collect::<HashSet<_>>().len()
}

fn assert_groups(labels: &[usize], group_size: usize) {
    let groups: Vec<usize> = labels
        .chunks(group_size)
        .map(|group| {
            assert_eq!(1, n_unique(group), "group {group:?} was split");
            group[0]
        })
        .collect();
    assert_eq!(groups.len(), n_unique(&groups), "groups were merged: {labels:?}");
}

pub fn test_similarity_symmetric(backend: &Backend) {
    let data = three_blobs();
    let a = (backend.similarity)(&SymNmf::default_hyper_params(&data)).unwrap();
    assert_eq!(a.shape(), (15, 15));
    assert!(a.is_symmetric(0.0));
    for i in 0..15 {
        assert_eq!(a[(i, i)], 0.0);
    }
}

pub fn test_two_pairs_affinity(backend: &Backend) {
    let data = two_pairs();
    let a = (backend.similarity)(&SymNmf::default_hyper_params(&data)).unwrap();
    let within = a[(0, 1)].min(a[(2, 3)]);
    let across = a[(0, 2)].max(a[(0, 3)]).max(a[(1, 2)]).max(a[(1, 3)]);
    assert!(within > 1e10 * across);
}

pub fn test_degree_is_row_sum(backend: &Backend) {
    let data = three_blobs();
    let model = SymNmf::default_hyper_params(&data);
    let a = (backend.similarity)(&model).unwrap();
    let d = (backend.degree)(&model).unwrap();
    for i in 0..data.len() {
        let row_sum: f64 = a.row(i).iter().sum();
        assert!((d[(i, i)] - row_sum).abs() < 1e-12);
        assert!(d.row(i).iter().enumerate().all(|(j, &x)| j == i || x == 0.0));
    }
}

pub fn test_normalized_in_unit_interval(backend: &Backend) {
    let data = three_blobs();
    let w = (backend.normalize)(&SymNmf::default_hyper_params(&data)).unwrap();
    assert!(w.is_symmetric(0.0));
    assert!(w.as_slice().iter().all(|&x| (0.0..=1.0 + 1e-12).contains(&x)));
}

pub fn test_two_pairs_end_to_end(backend: &Backend) {
    let data = two_pairs();
    let model = SymNmf::default_hyper_params(&data);
    let mut rng = StdRng::seed_from_u64(1234);
    let factorization = (backend.factorize)(&model, 2, &mut rng).unwrap();
    let nmf_labels = labels_from_factor(&factorization.h);
    assert_groups(&nmf_labels, 2);

    let fit = (backend.kmeans)(&KMeans::default_hyper_params(&data), 2, &mut rng).unwrap();
    assert!(fit.converged);
    assert_groups(&fit.labels, 2);
    assert_eq!(
        fit.centroids.to_rows(),
        vec![vec![0.0, 0.5], vec![10.0, 0.5]]
    );

    let nmf_score = (backend.silhouette)(&data, &nmf_labels).unwrap();
    let kmeans_score = (backend.silhouette)(&data, &fit.labels).unwrap();
    assert!(nmf_score > 0.85, "nmf silhouette {nmf_score}");
    assert!((nmf_score - kmeans_score).abs() < 1e-12);
}

pub fn test_three_blobs(backend: &Backend) {
    let data = three_blobs();
    let model = SymNmf::new(&data, tight_symnmf_params());
    let mut rng = StdRng::seed_from_u64(7);
    let factorization = (backend.factorize)(&model, 3, &mut rng).unwrap();
    assert_groups(&labels_from_factor(&factorization.h), 5);

    let fit = (backend.kmeans)(&KMeans::default_hyper_params(&data), 3, &mut rng).unwrap();
    assert_groups(&fit.labels, 5);
    let score = (backend.silhouette)(&data, &fit.labels).unwrap();
    assert!(score > 0.8 && score <= 1.0);
}

pub fn test_factor_non_negative_and_reproducible(backend: &Backend) {
    let data = three_blobs();
    let model = SymNmf::default_hyper_params(&data);
    let first = (backend.factorize)(&model, 3, &mut StdRng::seed_from_u64(5)).unwrap();
    let second = (backend.factorize)(&model, 3, &mut StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.h.shape(), (15, 3));
    assert!(first.h.as_slice().iter().all(|&x| x >= 0.0 && x.is_finite()));
    assert!(first.iterations >= 1 && first.iterations <= 300);
}

pub fn test_identical_points(backend: &Backend) {
    let data = vec![vec![2.0, -1.0]; 5];
    let model = SymNmf::default_hyper_params(&data);
    let mut rng = StdRng::seed_from_u64(1234);
    let a = (backend.similarity)(&model).unwrap();
    assert!(a
        .as_slice()
        .iter()
        .enumerate()
        .all(|(idx, &x)| if idx % 6 == 0 { x == 0.0 } else { x == 1.0 }));

    let factorization = (backend.factorize)(&model, 2, &mut rng).unwrap();
    let nmf_score = (backend.silhouette)(&data, &labels_from_factor(&factorization.h)).unwrap();
    assert!(nmf_score == -1.0 || nmf_score.abs() < 1e-12);

    let fit = (backend.kmeans)(&KMeans::default_hyper_params(&data), 2, &mut rng).unwrap();
    let kmeans_score = (backend.silhouette)(&data, &fit.labels).unwrap();
    assert!(kmeans_score == -1.0 || kmeans_score.abs() < 1e-12);
}

pub fn test_one_cluster_per_point(backend: &Backend) {
    let data = two_pairs();
    let model = SymNmf::default_hyper_params(&data);
    let mut rng = StdRng::seed_from_u64(1234);
    let factorization = (backend.factorize)(&model, 4, &mut rng).unwrap();
    assert_eq!(factorization.h.shape(), (4, 4));
    assert!(factorization.h.as_slice().iter().all(|&x| x >= 0.0 && x.is_finite()));
    let score = (backend.silhouette)(&data, &labels_from_factor(&factorization.h)).unwrap();
    assert!((-1.0..=1.0).contains(&score));

    let fit = (backend.kmeans)(&KMeans::default_hyper_params(&data), 4, &mut rng).unwrap();
    assert_eq!(n_unique(&fit.labels), 4);
    for (point, &label) in data.iter().zip(&fit.labels) {
        assert_eq!(fit.centroids.row(label), point.as_slice());
    }
}

pub fn test_single_cluster(backend: &Backend) {
    let data = three_blobs();
    let model = SymNmf::default_hyper_params(&data);
    let mut rng = StdRng::seed_from_u64(1234);
    let factorization = (backend.factorize)(&model, 1, &mut rng).unwrap();
    let labels = labels_from_factor(&factorization.h);
    assert!(labels.iter().all(|&label| label == 0));
    assert_eq!((backend.silhouette)(&data, &labels).unwrap(), -1.0);

    let fit = (backend.kmeans)(&KMeans::default_hyper_params(&data), 1, &mut rng).unwrap();
    assert_eq!((backend.silhouette)(&data, &fit.labels).unwrap(), -1.0);
}

pub fn test_kmeans_random_init_reproducible(backend: &Backend) {
    let data = three_blobs();
    let hp = KMeansHyperParams::builder().init(KMeansInit::Random).build();
    let model = KMeans::new(&data, hp);
    let first = (backend.kmeans)(&model, 3, &mut StdRng::seed_from_u64(31)).unwrap();
    let second = (backend.kmeans)(&model, 3, &mut StdRng::seed_from_u64(31)).unwrap();
    assert_eq!(first, second);
    assert!(first.labels.iter().all(|&label| label < 3));
}

pub fn test_kmeans_max_iter(backend: &Backend) {
    let data = three_blobs();
    let hp = KMeansHyperParams::builder().max_iter(1).build();
    let fit = (backend.kmeans)(&KMeans::new(&data, hp), 3, &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(fit.iterations, 1);
    assert!(!fit.converged);
}

pub fn test_empty_data(backend: &Backend) {
    let data: Vec<Vec<f64>> = Vec::new();
    let mut rng = StdRng::seed_from_u64(0);
    let model = SymNmf::default_hyper_params(&data);
    assert!(matches!((backend.similarity)(&model), Err(SymNmfError::InvalidInput(..))));
    assert!(matches!(
        (backend.factorize)(&model, 1, &mut rng),
        Err(SymNmfError::InvalidInput(..))
    ));
    assert!(matches!(
        (backend.kmeans)(&KMeans::default_hyper_params(&data), 1, &mut rng),
        Err(SymNmfError::InvalidInput(..))
    ));
}

pub fn test_mismatched_dimensions(backend: &Backend) {
    let data = vec![vec![1.5, 2.2], vec![1.0, 1.1], vec![1.2]];
    let model = SymNmf::default_hyper_params(&data);
    assert!(matches!((backend.normalize)(&model), Err(SymNmfError::InvalidInput(..))));
    assert!(matches!(
        (backend.silhouette)(&data, &[0, 1, 0]),
        Err(SymNmfError::InvalidInput(..))
    ));
}

pub fn test_cluster_count_out_of_range(backend: &Backend) {
    let data = two_pairs();
    let mut rng = StdRng::seed_from_u64(0);
    let model = SymNmf::default_hyper_params(&data);
    for k in [0, 5] {
        assert!(matches!(
            (backend.factorize)(&model, k, &mut rng),
            Err(SymNmfError::InvalidInput(..))
        ));
        assert!(matches!(
            (backend.kmeans)(&KMeans::default_hyper_params(&data), k, &mut rng),
            Err(SymNmfError::InvalidInput(..))
        ));
    }
}

pub fn test_degenerate_graph(backend: &Backend) {
    let data = vec![vec![0.0], vec![0.5], vec![1000.0]];
    let model = SymNmf::default_hyper_params(&data);
    assert!(matches!(
        (backend.normalize)(&model),
        Err(SymNmfError::DegenerateGraph { index: 2 })
    ));
    assert!(matches!(
        (backend.factorize)(&model, 2, &mut StdRng::seed_from_u64(0)),
        Err(SymNmfError::DegenerateGraph { index: 2 })
    ));
}
