//! Exact (brute-force) cosine nearest-neighbor index.

use crate::catalog::Catalog;
use crate::error::{DescubrirError, Result};
use crate::metrics::cosine_distance;
use crate::primitives::{Matrix, Vector};
use rayon::prelude::*;

/// Exact nearest-neighbor index over catalog embeddings.
///
/// Built once from the catalog at initialization and never mutated, so any
/// number of threads may query it concurrently without coordination. Each
/// query is an O(N·D) scan, parallelized across rows.
///
/// Queries may be catalog members (the item itself comes back at rank 0
/// with distance ~0) or synthetic vectors such as a cart centroid.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    vectors: Matrix<f64>,
}

impl FlatIndex {
    /// Builds the index by snapshotting the catalog's embedding matrix.
    #[must_use]
    pub fn build(catalog: &Catalog) -> Self {
        Self {
            vectors: catalog.embeddings().clone(),
        }
    }

    /// Number of indexed vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.n_rows()
    }

    /// Returns true if the index holds no vectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.n_rows() == 0
    }

    /// Searches for the k nearest neighbors of a query vector.
    ///
    /// Returns `(product_index, cosine_distance)` pairs sorted by ascending
    /// distance, ties broken by ascending product index, truncated to
    /// `min(k, len())`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `k == 0` or the query dimension doesn't match
    /// - `EmptyIndex` if no vectors are indexed
    pub fn query(&self, query: &Vector<f64>, k: usize) -> Result<Vec<(usize, f64)>> {
        if k == 0 {
            return Err(DescubrirError::invalid_argument("k must be >= 1"));
        }
        if self.is_empty() {
            return Err(DescubrirError::EmptyIndex);
        }
        if query.len() != self.vectors.n_cols() {
            return Err(DescubrirError::invalid_argument(format!(
                "query dimension {} does not match index dimension {}",
                query.len(),
                self.vectors.n_cols()
            )));
        }

        let mut results: Vec<(usize, f64)> = (0..self.len())
            .into_par_iter()
            .map(|i| (i, cosine_distance(query, &self.vectors.row(i))))
            .collect();

        results.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        results.truncate(k);
        Ok(results)
    }
}
