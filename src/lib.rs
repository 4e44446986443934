//! Descubrir: embedding-based product discovery in pure Rust.
//!
//! Descubrir clusters a fixed catalog of image embeddings into named
//! categories, builds a cosine nearest-neighbor index over them, and
//! derives ranked recommendations from either a single product or a
//! quantity-weighted cart centroid. The catalog, category model, and
//! index are built once at startup and shared read-only afterwards, so
//! queries need no coordination between threads.
//!
//! # Quick Start
//!
//! ```
//! use descubrir::prelude::*;
//!
//! // Five 3-D embeddings: two near the x axis, two near y, one on z
//! let catalog = Catalog::from_rows(vec![
//!     vec![1.0, 0.0, 0.0],
//!     vec![0.9, 0.1, 0.0],
//!     vec![0.0, 1.0, 0.0],
//!     vec![0.0, 0.9, 0.1],
//!     vec![0.0, 0.0, 1.0],
//! ]).unwrap();
//!
//! let engine = Engine::initialize(
//!     catalog,
//!     EngineConfig::new().with_n_categories(3),
//! ).unwrap();
//!
//! // Product 1 is the nearest neighbor of product 0
//! let recs = engine.recommend_for_item(0).unwrap();
//! assert_eq!(recs[0].product, 1);
//!
//! // Cart recommendations flow through the quantity-weighted centroid
//! let mut cart = Cart::new();
//! cart.add(0);
//! let recs = engine.recommend_for_cart(&cart).unwrap();
//! assert!(recs.iter().all(|r| r.product != 0));
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`catalog`]: Immutable catalog of normalized embeddings
//! - [`cluster`]: K-Means clustering and the catalog categorizer
//! - [`index`]: Exact cosine nearest-neighbor search
//! - [`cart`]: Cart state and the quantity-weighted centroid
//! - [`recommend`]: Ranked, self-excluding recommendation lists
//! - [`render`]: Bounded LRU preview cache for the display layer
//! - [`engine`]: The initialized, immutable query context
//! - [`metrics`]: Cosine similarity/distance and clustering inertia

pub mod cart;
pub mod catalog;
pub mod cluster;
pub mod engine;
pub mod error;
pub mod index;
pub mod metrics;
pub mod prelude;
pub mod primitives;
pub mod recommend;
pub mod render;

pub use error::{DescubrirError, Result};
pub use primitives::{Matrix, Vector};
