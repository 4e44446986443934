//! Similarity index: exact cosine nearest-neighbor search.
//!
//! The catalog is small enough (and queries cheap enough) that an exact
//! scan beats an approximate graph here, and only an exact scan can honor
//! the determinism contract: results ordered by ascending distance with
//! ties broken by ascending product index.
//!
//! # Quick Start
//!
//! ```
//! use descubrir::catalog::Catalog;
//! use descubrir::index::FlatIndex;
//! use descubrir::primitives::Vector;
//!
//! let catalog = Catalog::from_rows(vec![
//!     vec![1.0, 0.0, 0.0],
//!     vec![0.0, 1.0, 0.0],
//!     vec![0.9, 0.1, 0.0],
//! ]).unwrap();
//!
//! let index = FlatIndex::build(&catalog);
//! let query = Vector::from_slice(&[1.0, 0.05, 0.0]);
//! let results = index.query(&query, 2).unwrap();
//!
//! assert_eq!(results[0].0, 0); // nearest to the x axis
//! assert!(results[0].1 <= results[1].1);
//! ```

mod flat;

pub use flat::FlatIndex;
