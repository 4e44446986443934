//! Similarity and clustering metrics.
//!
//! Cosine distance is the crate-wide nearest-neighbor metric; inertia is
//! the k-means objective.

use crate::primitives::{Matrix, Vector};

/// Computes cosine similarity between two vectors.
///
/// Returns values in [-1, 1]. Zero-norm operands get defined results
/// instead of NaN: two zero vectors count as identical (1.0), a zero
/// vector against anything else counts as maximally dissimilar (-1.0).
/// A catalog can legitimately contain zero rows (an all-minimum image
/// normalizes to zeros), so these cases must stay totally ordered.
/// Mismatched lengths yield `f64::NEG_INFINITY` so the pair sorts behind
/// every real match.
///
/// # Examples
///
/// ```
/// use descubrir::metrics::cosine_similarity;
/// use descubrir::primitives::Vector;
///
/// let a = Vector::from_slice(&[1.0, 0.0]);
/// let b = Vector::from_slice(&[1.0, 0.0]);
/// assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn cosine_similarity(a: &Vector<f64>, b: &Vector<f64>) -> f64 {
    if a.len() != b.len() {
        return f64::NEG_INFINITY;
    }

    let norm_a = a.norm();
    let norm_b = b.norm();

    if norm_a == 0.0 && norm_b == 0.0 {
        return 1.0;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return -1.0;
    }

    (a.dot(b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Computes cosine distance (1 - cosine similarity).
///
/// Returns values in [0, 2]:
/// - 0: identical direction (including zero vs. zero)
/// - 1: orthogonal
/// - 2: opposite direction (including zero vs. non-zero)
///
/// Mismatched lengths yield `f64::INFINITY`.
#[must_use]
pub fn cosine_distance(a: &Vector<f64>, b: &Vector<f64>) -> f64 {
    let sim = cosine_similarity(a, b);
    if sim == f64::NEG_INFINITY {
        return f64::INFINITY;
    }
    1.0 - sim
}

/// Computes the within-cluster sum of squared distances (inertia).
///
/// # Panics
///
/// Panics if `labels` is shorter than the number of rows in `data` or a
/// label exceeds the centroid count.
#[must_use]
pub fn inertia(data: &Matrix<f64>, centroids: &Matrix<f64>, labels: &[usize]) -> f64 {
    let mut total = 0.0;

    for (i, &label) in labels.iter().enumerate() {
        let point = data.row(i);
        let centroid = centroids.row(label);
        let diff = &point - &centroid;
        total += diff.norm_squared();
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = Vector::from_slice(&[0.5, 0.5, 0.0]);
        let b = Vector::from_slice(&[1.0, 1.0, 0.0]);
        // Same direction, different magnitude
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_distance_orthogonal() {
        let a = Vector::from_slice(&[1.0, 0.0]);
        let b = Vector::from_slice(&[0.0, 1.0]);
        assert!((cosine_distance(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_distance_opposite() {
        let a = Vector::from_slice(&[1.0, 0.0]);
        let b = Vector::from_slice(&[-1.0, 0.0]);
        assert!((cosine_distance(&a, &b) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_distance_zero_vs_nonzero_is_max() {
        let a = Vector::from_slice(&[0.0, 0.0]);
        let b = Vector::from_slice(&[1.0, 0.0]);
        assert!((cosine_distance(&a, &b) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_distance_zero_vs_zero_is_identical() {
        let a = Vector::from_slice(&[0.0, 0.0]);
        let b = Vector::from_slice(&[0.0, 0.0]);
        assert!(cosine_distance(&a, &b).abs() < 1e-12);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_distance_length_mismatch() {
        let a = Vector::from_slice(&[1.0]);
        let b = Vector::from_slice(&[1.0, 0.0]);
        assert_eq!(cosine_distance(&a, &b), f64::INFINITY);
    }

    #[test]
    fn test_inertia_perfect_fit() {
        // Each point is its own centroid
        let data = Matrix::from_vec(2, 2, vec![0.0, 0.0, 1.0, 1.0]).unwrap();
        let centroids = data.clone();
        let labels = vec![0, 1];
        assert!(inertia(&data, &centroids, &labels) < 1e-12);
    }

    #[test]
    fn test_inertia_positive() {
        let data = Matrix::from_vec(2, 1, vec![0.0, 2.0]).unwrap();
        let centroids = Matrix::from_vec(1, 1, vec![1.0]).unwrap();
        let labels = vec![0, 0];
        // (0-1)^2 + (2-1)^2 = 2
        assert!((inertia(&data, &centroids, &labels) - 2.0).abs() < 1e-12);
    }
}
