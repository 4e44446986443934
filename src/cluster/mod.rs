//! Clustering: K-Means and the catalog categorizer.
//!
//! [`KMeans`] is Lloyd's algorithm with seeded k-means++ initialization.
//! [`Categorizer`] runs it once over a catalog and turns the cluster ids
//! into named categories; naming is a pure post-processing step over the
//! ids, so alternate naming schemes can be swapped without touching the
//! clustering itself.

use crate::catalog::Catalog;
use crate::error::{DescubrirError, Result};
use crate::metrics::inertia;
use crate::primitives::Matrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Seed used when no explicit random state is configured.
///
/// A fixed default keeps category assignments reproducible across runs
/// given identical input data.
pub const DEFAULT_SEED: u64 = 42;

/// K-Means clustering algorithm.
///
/// Uses Lloyd's algorithm with k-means++ initialization driven by a seeded
/// RNG, so a given (data, seed) pair always produces the same labels.
///
/// # Algorithm
///
/// 1. Initialize centroids using k-means++ (D² sampling)
/// 2. Assign each sample to its nearest centroid
/// 3. Update centroids as the mean of assigned samples
/// 4. Repeat until centroid movement < tol or max iterations
///
/// # Examples
///
/// ```
/// use descubrir::cluster::KMeans;
/// use descubrir::primitives::Matrix;
///
/// let data = Matrix::from_vec(6, 2, vec![
///     1.0, 2.0,
///     1.5, 1.8,
///     1.0, 0.6,
///     8.0, 8.0,
///     9.0, 11.0,
///     8.5, 9.0,
/// ]).unwrap();
///
/// let mut kmeans = KMeans::new(2).with_random_state(42);
/// kmeans.fit(&data).unwrap();
///
/// let labels = kmeans.predict(&data);
/// assert_eq!(labels.len(), 6);
/// ```
///
/// # Performance
///
/// - Time complexity: O(nkdi) where n=samples, k=clusters, d=features, i=iterations
/// - Space complexity: O(nk)
#[derive(Debug, Clone)]
pub struct KMeans {
    /// Number of clusters.
    n_clusters: usize,
    /// Maximum iterations.
    max_iter: usize,
    /// Convergence tolerance on centroid movement.
    tol: f64,
    /// Random seed for initialization.
    random_state: Option<u64>,
    /// Cluster centroids after fitting.
    centroids: Option<Matrix<f64>>,
    /// Sum of squared distances (inertia).
    inertia: f64,
    /// Number of iterations run.
    n_iter: usize,
}

impl KMeans {
    /// Creates a new K-Means with the specified number of clusters.
    #[must_use]
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iter: 300,
            tol: 1e-6,
            random_state: None,
            centroids: None,
            inertia: 0.0,
            n_iter: 0,
        }
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Returns the cluster centroids.
    ///
    /// # Panics
    ///
    /// Panics if the model is not fitted.
    #[must_use]
    pub fn centroids(&self) -> &Matrix<f64> {
        self.centroids
            .as_ref()
            .expect("Model not fitted. Call fit() first.")
    }

    /// Returns the inertia (within-cluster sum of squares).
    #[must_use]
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Returns the number of iterations run.
    #[must_use]
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.centroids.is_some()
    }

    /// Fits the model to data.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` if `n_clusters` is 0 or exceeds the sample count
    /// - `InvalidArgument` if the data has no rows
    pub fn fit(&mut self, x: &Matrix<f64>) -> Result<()> {
        let n_samples = x.n_rows();

        if n_samples == 0 {
            return Err(DescubrirError::invalid_argument(
                "cannot fit with zero samples",
            ));
        }

        if self.n_clusters == 0 {
            return Err(DescubrirError::InvalidConfiguration {
                param: "n_clusters".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }

        if n_samples < self.n_clusters {
            return Err(DescubrirError::InvalidConfiguration {
                param: "n_clusters".to_string(),
                value: self.n_clusters.to_string(),
                constraint: format!("<= number of samples ({n_samples})"),
            });
        }

        let mut centroids = self.kmeans_plusplus_init(x);
        let mut labels = vec![0; n_samples];

        for iter in 0..self.max_iter {
            labels = self.assign_labels(x, &centroids);

            let new_centroids = self.update_centroids(x, &labels, &centroids);

            let converged = self.centroids_converged(&centroids, &new_centroids);
            centroids = new_centroids;
            self.n_iter = iter + 1;

            if converged {
                break;
            }
        }

        self.inertia = inertia(x, &centroids, &labels);
        self.centroids = Some(centroids);

        Ok(())
    }

    /// Predicts cluster labels for data.
    ///
    /// # Panics
    ///
    /// Panics if the model is not fitted.
    #[must_use]
    pub fn predict(&self, x: &Matrix<f64>) -> Vec<usize> {
        let centroids = self
            .centroids
            .as_ref()
            .expect("Model not fitted. Call fit() first.");

        self.assign_labels(x, centroids)
    }

    /// Initializes centroids using k-means++ D² sampling.
    fn kmeans_plusplus_init(&self, x: &Matrix<f64>) -> Matrix<f64> {
        let (n_samples, n_features) = x.shape();
        let mut rng = StdRng::seed_from_u64(self.random_state.unwrap_or(DEFAULT_SEED));

        let mut centroids_data = Vec::with_capacity(self.n_clusters * n_features);

        let first_idx = rng.gen_range(0..n_samples);
        centroids_data.extend_from_slice(x.row_slice(first_idx));

        for c in 1..self.n_clusters {
            // Squared distance from each point to its nearest chosen centroid
            let n_current = centroids_data.len() / n_features;
            let mut min_distances = vec![f64::INFINITY; n_samples];

            for (i, min_dist) in min_distances.iter_mut().enumerate() {
                let point = x.row_slice(i);
                for chosen in 0..n_current {
                    let centroid = &centroids_data[chosen * n_features..(chosen + 1) * n_features];
                    let dist_sq: f64 = point
                        .iter()
                        .zip(centroid.iter())
                        .map(|(a, b)| (a - b) * (a - b))
                        .sum();
                    if dist_sq < *min_dist {
                        *min_dist = dist_sq;
                    }
                }
            }

            // Sample proportional to D²; all-zero distances mean duplicate
            // points, fall back to a rotating pick
            let total: f64 = min_distances.iter().sum();
            let next_idx = if total > 0.0 {
                // Farthest point is the fallback if rounding exhausts the scan
                let mut chosen = min_distances
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                    .map_or(0, |(i, _)| i);
                let mut threshold = rng.gen_range(0.0..total);
                for (i, &dist) in min_distances.iter().enumerate() {
                    if threshold < dist {
                        chosen = i;
                        break;
                    }
                    threshold -= dist;
                }
                chosen
            } else {
                c % n_samples
            };

            centroids_data.extend_from_slice(x.row_slice(next_idx));
        }

        Matrix::from_vec(self.n_clusters, n_features, centroids_data)
            .expect("Internal error: centroid matrix creation failed")
    }

    /// Assigns each sample to the nearest centroid.
    ///
    /// Strict less-than keeps the lowest cluster id on exact ties, so
    /// assignment is deterministic.
    fn assign_labels(&self, x: &Matrix<f64>, centroids: &Matrix<f64>) -> Vec<usize> {
        let n_samples = x.n_rows();
        let n_features = x.n_cols();
        let mut labels = vec![0; n_samples];

        for (i, label) in labels.iter_mut().enumerate() {
            let point = x.row_slice(i);
            let mut min_dist = f64::INFINITY;
            let mut min_cluster = 0;

            for k in 0..self.n_clusters {
                let centroid = centroids.row_slice(k);
                let mut dist = 0.0;
                for j in 0..n_features {
                    let diff = point[j] - centroid[j];
                    dist += diff * diff;
                }

                if dist < min_dist {
                    min_dist = dist;
                    min_cluster = k;
                }
            }

            *label = min_cluster;
        }

        labels
    }

    /// Updates centroids as the mean of assigned samples.
    ///
    /// Empty clusters keep their previous centroid.
    fn update_centroids(
        &self,
        x: &Matrix<f64>,
        labels: &[usize],
        previous: &Matrix<f64>,
    ) -> Matrix<f64> {
        let (_, n_features) = x.shape();
        let mut new_centroids = vec![0.0; self.n_clusters * n_features];
        let mut counts = vec![0usize; self.n_clusters];

        for (i, &label) in labels.iter().enumerate() {
            counts[label] += 1;
            let point = x.row_slice(i);
            for j in 0..n_features {
                new_centroids[label * n_features + j] += point[j];
            }
        }

        for k in 0..self.n_clusters {
            if counts[k] > 0 {
                for j in 0..n_features {
                    new_centroids[k * n_features + j] /= counts[k] as f64;
                }
            } else {
                for j in 0..n_features {
                    new_centroids[k * n_features + j] = previous.get(k, j);
                }
            }
        }

        Matrix::from_vec(self.n_clusters, n_features, new_centroids)
            .expect("Internal error: centroid update failed")
    }

    /// Checks whether centroids have stopped moving.
    fn centroids_converged(&self, old: &Matrix<f64>, new: &Matrix<f64>) -> bool {
        let (n_clusters, n_features) = old.shape();

        for k in 0..n_clusters {
            let mut dist_sq = 0.0;
            for j in 0..n_features {
                let diff = old.get(k, j) - new.get(k, j);
                dist_sq += diff * diff;
            }
            if dist_sq > self.tol * self.tol {
                return false;
            }
        }

        true
    }
}

/// Offline categorizer: clusters a catalog once into K named categories.
///
/// # Examples
///
/// ```
/// use descubrir::catalog::Catalog;
/// use descubrir::cluster::Categorizer;
///
/// let catalog = Catalog::from_rows(vec![
///     vec![1.0, 0.0],
///     vec![0.9, 0.1],
///     vec![0.0, 1.0],
///     vec![0.1, 0.9],
/// ]).unwrap();
///
/// let model = Categorizer::new(2).fit(&catalog).unwrap();
/// assert_eq!(model.names(), &["Category 1", "Category 2"]);
/// assert!(model.label_of(0).unwrap() < 2);
/// ```
#[derive(Debug, Clone)]
pub struct Categorizer {
    n_categories: usize,
    random_state: u64,
    max_iter: usize,
}

impl Categorizer {
    /// Creates a categorizer producing `n_categories` categories.
    #[must_use]
    pub fn new(n_categories: usize) -> Self {
        Self {
            n_categories,
            random_state: DEFAULT_SEED,
            max_iter: 300,
        }
    }

    /// Sets the random seed used for clustering.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Sets the clustering iteration bound.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Clusters the catalog and assigns every product exactly one label.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `n_categories` is 0 or exceeds the
    /// catalog size.
    pub fn fit(&self, catalog: &Catalog) -> Result<CategoryModel> {
        if self.n_categories == 0 || self.n_categories > catalog.len() {
            return Err(DescubrirError::InvalidConfiguration {
                param: "n_categories".to_string(),
                value: self.n_categories.to_string(),
                constraint: format!("in [1, {}] (catalog size)", catalog.len()),
            });
        }

        let mut kmeans = KMeans::new(self.n_categories)
            .with_random_state(self.random_state)
            .with_max_iter(self.max_iter);
        kmeans.fit(catalog.embeddings())?;

        let labels = kmeans.predict(catalog.embeddings());
        Ok(CategoryModel::new(labels, self.n_categories))
    }
}

/// Per-product category assignment plus cosmetic display names.
///
/// Labels are stable for the lifetime of the process: derived once at
/// initialization, never recomputed per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryModel {
    labels: Vec<usize>,
    names: Vec<String>,
}

impl CategoryModel {
    fn new(labels: Vec<usize>, n_categories: usize) -> Self {
        let names = (0..n_categories)
            .map(|i| format!("Category {}", i + 1))
            .collect();
        Self { labels, names }
    }

    /// Number of categories K.
    #[must_use]
    pub fn n_categories(&self) -> usize {
        self.names.len()
    }

    /// Per-product label ids, one per catalog index.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Ordered display names, "Category 1" through "Category K".
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Label id of a product.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `index` is outside the catalog.
    pub fn label_of(&self, index: usize) -> Result<usize> {
        self.labels
            .get(index)
            .copied()
            .ok_or_else(|| DescubrirError::out_of_range(index, self.labels.len()))
    }

    /// Display name of a product's category.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `index` is outside the catalog.
    pub fn name_of(&self, index: usize) -> Result<&str> {
        let label = self.label_of(index)?;
        Ok(&self.names[label])
    }

    /// All product indices assigned the given label id, ascending.
    #[must_use]
    pub fn indices_with_label(&self, label: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == label)
            .map(|(i, _)| i)
            .collect()
    }

    /// All product indices whose category has the given display name,
    /// ascending. Unknown names yield an empty set.
    #[must_use]
    pub fn indices_with_name(&self, name: &str) -> Vec<usize> {
        match self.names.iter().position(|n| n == name) {
            Some(label) => self.indices_with_label(label),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> Matrix<f64> {
        // Two well-separated clusters
        Matrix::from_vec(
            6,
            2,
            vec![1.0, 2.0, 1.5, 1.8, 1.0, 0.6, 8.0, 8.0, 9.0, 11.0, 8.5, 9.0],
        )
        .unwrap()
    }

    fn sample_catalog() -> Catalog {
        Catalog::from_rows(vec![
            vec![1.0, 0.0],
            vec![0.9, 0.1],
            vec![0.8, 0.0],
            vec![0.0, 1.0],
            vec![0.1, 0.9],
            vec![0.0, 0.8],
        ])
        .unwrap()
    }

    #[test]
    fn test_new() {
        let kmeans = KMeans::new(3);
        assert_eq!(kmeans.n_clusters, 3);
        assert!(!kmeans.is_fitted());
    }

    #[test]
    fn test_fit_basic() {
        let data = sample_data();
        let mut kmeans = KMeans::new(2).with_random_state(42);
        kmeans.fit(&data).unwrap();

        assert!(kmeans.is_fitted());
        assert_eq!(kmeans.centroids().shape(), (2, 2));
        assert!(kmeans.inertia() >= 0.0);
        assert!(kmeans.n_iter() >= 1);
    }

    #[test]
    fn test_labels_consistency() {
        let data = sample_data();
        let mut kmeans = KMeans::new(2).with_random_state(42);
        kmeans.fit(&data).unwrap();

        let labels = kmeans.predict(&data);
        assert_eq!(labels.len(), 6);

        // First 3 points form one cluster, last 3 the other
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn test_empty_data_error() {
        let data = Matrix::from_vec(0, 2, vec![]).unwrap();
        let mut kmeans = KMeans::new(2);
        assert!(kmeans.fit(&data).is_err());
    }

    #[test]
    fn test_zero_clusters_error() {
        let data = sample_data();
        let mut kmeans = KMeans::new(0);
        let err = kmeans.fit(&data).unwrap_err();
        assert!(matches!(err, DescubrirError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_too_many_clusters_error() {
        let data = Matrix::from_vec(3, 2, vec![1.0; 6]).unwrap();
        let mut kmeans = KMeans::new(5);
        let err = kmeans.fit(&data).unwrap_err();
        assert!(matches!(err, DescubrirError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_reproducibility() {
        let data = sample_data();

        let mut kmeans1 = KMeans::new(2).with_random_state(42);
        kmeans1.fit(&data).unwrap();

        let mut kmeans2 = KMeans::new(2).with_random_state(42);
        kmeans2.fit(&data).unwrap();

        assert_eq!(kmeans1.predict(&data), kmeans2.predict(&data));

        let c1 = kmeans1.centroids();
        let c2 = kmeans2.centroids();
        for i in 0..2 {
            for j in 0..2 {
                assert!((c1.get(i, j) - c2.get(i, j)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_identical_points() {
        let data = Matrix::from_vec(5, 2, vec![1.0; 10]).unwrap();
        let mut kmeans = KMeans::new(2).with_random_state(42);
        kmeans.fit(&data).unwrap();

        let labels = kmeans.predict(&data);
        let first = labels[0];
        assert!(labels.iter().all(|&l| l == first));
        assert!(kmeans.inertia() < 1e-9);
    }

    #[test]
    fn test_inertia_decreases_with_more_clusters() {
        let data = sample_data();

        let mut kmeans1 = KMeans::new(1).with_random_state(42);
        kmeans1.fit(&data).unwrap();

        let mut kmeans2 = KMeans::new(2).with_random_state(42);
        kmeans2.fit(&data).unwrap();

        assert!(kmeans2.inertia() <= kmeans1.inertia());
    }

    #[test]
    fn test_exact_k_samples() {
        let data = Matrix::from_vec(3, 2, vec![0.0, 0.0, 5.0, 5.0, 10.0, 10.0]).unwrap();
        let mut kmeans = KMeans::new(3).with_random_state(42);
        kmeans.fit(&data).unwrap();

        let labels = kmeans.predict(&data);
        assert_ne!(labels[0], labels[1]);
        assert_ne!(labels[1], labels[2]);
        assert_ne!(labels[0], labels[2]);
        assert!(kmeans.inertia() < 1e-9);
    }

    #[test]
    fn test_max_iter_limit() {
        let data = sample_data();
        let mut kmeans = KMeans::new(2).with_max_iter(1).with_random_state(42);
        kmeans.fit(&data).unwrap();
        assert_eq!(kmeans.n_iter(), 1);
    }

    #[test]
    fn test_categorizer_coverage() {
        let catalog = sample_catalog();
        let model = Categorizer::new(2).fit(&catalog).unwrap();

        // Every product has exactly one label; labels partition the range
        assert_eq!(model.labels().len(), catalog.len());
        let mut seen = vec![false; catalog.len()];
        for label in 0..model.n_categories() {
            for idx in model.indices_with_label(label) {
                assert!(!seen[idx], "index {idx} assigned twice");
                seen[idx] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_categorizer_names_contiguous() {
        let catalog = sample_catalog();
        let model = Categorizer::new(3).fit(&catalog).unwrap();
        assert_eq!(
            model.names(),
            &["Category 1", "Category 2", "Category 3"]
        );
    }

    #[test]
    fn test_categorizer_determinism() {
        let catalog = sample_catalog();
        let a = Categorizer::new(2).fit(&catalog).unwrap();
        let b = Categorizer::new(2).fit(&catalog).unwrap();
        assert_eq!(a.labels(), b.labels());
    }

    #[test]
    fn test_categorizer_k_larger_than_catalog() {
        let catalog = sample_catalog();
        let err = Categorizer::new(10).fit(&catalog).unwrap_err();
        assert!(matches!(err, DescubrirError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_categorizer_k_zero() {
        let catalog = sample_catalog();
        let err = Categorizer::new(0).fit(&catalog).unwrap_err();
        assert!(matches!(err, DescubrirError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_category_model_lookups() {
        let catalog = sample_catalog();
        let model = Categorizer::new(2).fit(&catalog).unwrap();

        let label0 = model.label_of(0).unwrap();
        let name0 = model.name_of(0).unwrap();
        assert_eq!(name0, format!("Category {}", label0 + 1));

        let members = model.indices_with_name(name0);
        assert!(members.contains(&0));
        // Ascending order
        assert!(members.windows(2).all(|w| w[0] < w[1]));

        assert!(model.indices_with_name("No Such Category").is_empty());
        assert!(model.label_of(99).is_err());
    }
}
