//! Recommendation engine.
//!
//! Composes similarity-index results into ranked, self-excluding
//! recommendation lists, from either a single product or a cart centroid.
//!
//! # Quick Start
//!
//! ```
//! use descubrir::catalog::Catalog;
//! use descubrir::index::FlatIndex;
//! use descubrir::recommend::recommend_for_item;
//!
//! let catalog = Catalog::from_rows(vec![
//!     vec![1.0, 0.0, 0.0],
//!     vec![0.9, 0.1, 0.0],
//!     vec![0.0, 1.0, 0.0],
//!     vec![0.0, 0.9, 0.1],
//!     vec![0.0, 0.0, 1.0],
//! ]).unwrap();
//! let index = FlatIndex::build(&catalog);
//!
//! let recs = recommend_for_item(&catalog, &index, 0).unwrap();
//! assert_eq!(recs.len(), 3);
//! assert_eq!(recs[0].product, 1); // nearest neighbor of product 0
//! ```

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::index::FlatIndex;
use serde::{Deserialize, Serialize};

/// Maximum number of recommendations returned by either entry point.
pub const MAX_RECOMMENDATIONS: usize = 3;

/// A single ranked recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Recommended product index.
    pub product: usize,
    /// Cosine similarity to the query (1 - cosine distance), in [-1, 1].
    pub similarity: f64,
}

impl Recommendation {
    /// Similarity formatted for display as a percentage with one decimal,
    /// e.g. 0.823 renders as "82.3%". Similarity spans [-1, 1], so
    /// anti-aligned neighbors render with a sign ("-100.0%"); the display
    /// is not clamped.
    #[must_use]
    pub fn similarity_percent(&self) -> String {
        format!("{:.1}%", self.similarity * 100.0)
    }
}

/// Recommends up to 3 products similar to the given product.
///
/// Queries the index with the product's own embedding requesting 4
/// neighbors, removes the query item itself wherever it ranks, and maps
/// the rest to descending-similarity recommendations. The discard is by
/// identity, not position: with duplicate embeddings the index tie-break
/// can rank a lower-indexed duplicate ahead of the item, and a positional
/// discard would let the item recommend itself. With fewer than 4 catalog
/// items this returns however many remain, possibly zero.
///
/// # Errors
///
/// Returns `OutOfRange` if `product` is outside the catalog, or any index
/// query error.
pub fn recommend_for_item(
    catalog: &Catalog,
    index: &FlatIndex,
    product: usize,
) -> Result<Vec<Recommendation>> {
    let embedding = catalog.embedding_of(product)?;
    let neighbors = index.query(&embedding, MAX_RECOMMENDATIONS + 1)?;

    let mut recs: Vec<Recommendation> = neighbors
        .into_iter()
        .filter(|&(p, _)| p != product)
        .map(|(p, distance)| Recommendation {
            product: p,
            similarity: 1.0 - distance,
        })
        .collect();
    recs.truncate(MAX_RECOMMENDATIONS);
    Ok(recs)
}

/// Recommends up to 3 products for the aggregate cart.
///
/// An empty cart yields an empty list without touching the index.
/// Otherwise the cart centroid is queried for 4 neighbors and the literal
/// rank-0 result is discarded. The centroid is synthetic, so there is no
/// identity to filter on; rank 0 is not necessarily a cart member, and
/// the unconditional positional discard is the legacy contract this
/// engine preserves (see DESIGN.md).
///
/// # Errors
///
/// Returns `OutOfRange` if a cart entry references a product outside the
/// catalog, or any index query error.
pub fn recommend_for_cart(
    catalog: &Catalog,
    index: &FlatIndex,
    cart: &Cart,
) -> Result<Vec<Recommendation>> {
    if cart.is_empty() {
        return Ok(Vec::new());
    }

    let centroid = cart.centroid(catalog)?;
    let neighbors = index.query(&centroid, MAX_RECOMMENDATIONS + 1)?;

    Ok(collect_skipping_first(neighbors))
}

fn collect_skipping_first(neighbors: Vec<(usize, f64)>) -> Vec<Recommendation> {
    neighbors
        .into_iter()
        .skip(1)
        .map(|(product, distance)| Recommendation {
            product,
            similarity: 1.0 - distance,
        })
        .collect()
}
