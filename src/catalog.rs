//! Catalog Store: the immutable embedding table.
//!
//! A [`Catalog`] holds N embeddings of dimension D, one per product,
//! normalized to [0, 1] exactly once at construction. Every downstream
//! component (categorizer, similarity index, cart aggregator) reads the
//! same table and assumes pre-normalized vectors. The catalog is never
//! mutated after load, so it is safe to share across threads by reference.

use crate::error::{DescubrirError, Result};
use crate::primitives::{Matrix, Vector};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Immutable catalog of product embeddings.
///
/// # Examples
///
/// ```
/// use descubrir::catalog::Catalog;
///
/// let catalog = Catalog::from_rows(vec![
///     vec![1.0, 0.0, 0.0],
///     vec![0.0, 1.0, 0.0],
/// ]).expect("rows share one dimension");
///
/// assert_eq!(catalog.len(), 2);
/// assert_eq!(catalog.dim(), 3);
/// assert_eq!(catalog.embedding_of(0).unwrap().as_slice(), &[1.0, 0.0, 0.0]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    embeddings: Matrix<f64>,
}

impl Catalog {
    /// Builds a catalog from raw feature rows, normalizing values to [0, 1].
    ///
    /// Normalization is global min-max scaling: every value is rescaled by
    /// the catalog-wide minimum and maximum, since pixel intensities share
    /// one scale. A degenerate range (all values equal) maps to 0.0. Input
    /// already spanning exactly [0, 1] passes through unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoad` if the row set is empty, a row is empty, or
    /// rows disagree on dimension.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(DescubrirError::catalog_load("no rows in catalog source"));
        }

        let dim = rows[0].len();
        if dim == 0 {
            return Err(DescubrirError::catalog_load("rows have zero features"));
        }

        let mut data = Vec::with_capacity(rows.len() * dim);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(DescubrirError::catalog_load(format!(
                    "row {i} has {} values, expected {dim}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }

        normalize_in_place(&mut data);

        let n_rows = rows.len();
        let embeddings = Matrix::from_vec(n_rows, dim, data)
            .map_err(DescubrirError::catalog_load)?;

        Ok(Self { embeddings })
    }

    /// Loads a catalog from a text file of numeric rows.
    ///
    /// Values are separated by commas or whitespace, one product per line.
    /// Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, `CatalogLoad` if a value
    /// fails to parse or the rows are malformed.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut rows = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let row: Result<Vec<f64>> = trimmed
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|tok| !tok.is_empty())
                .map(|tok| {
                    tok.parse::<f64>().map_err(|_| {
                        DescubrirError::catalog_load(format!(
                            "line {}: cannot parse {tok:?} as a number",
                            line_no + 1
                        ))
                    })
                })
                .collect();
            rows.push(row?);
        }

        Self::from_rows(rows)
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.embeddings.n_rows()
    }

    /// Returns true if the catalog holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.embeddings.n_rows() == 0
    }

    /// Embedding dimension D.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.embeddings.n_cols()
    }

    /// Returns the normalized embedding of a product.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `index >= len()`.
    pub fn embedding_of(&self, index: usize) -> Result<Vector<f64>> {
        if index >= self.len() {
            return Err(DescubrirError::out_of_range(index, self.len()));
        }
        Ok(self.embeddings.row(index))
    }

    /// The full embedding matrix (one row per product).
    #[must_use]
    pub fn embeddings(&self) -> &Matrix<f64> {
        &self.embeddings
    }
}

/// Global min-max scaling to [0, 1]; degenerate range maps to 0.0.
fn normalize_in_place(data: &mut [f64]) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in data.iter() {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }

    let range = max - min;
    if range > 0.0 {
        for v in data.iter_mut() {
            *v = (*v - min) / range;
        }
    } else {
        for v in data.iter_mut() {
            *v = 0.0;
        }
    }
}
