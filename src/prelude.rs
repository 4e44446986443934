//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use descubrir::prelude::*;
//! ```

pub use crate::cart::{Cart, CartItem};
pub use crate::catalog::Catalog;
pub use crate::cluster::{Categorizer, CategoryModel, KMeans};
pub use crate::engine::{Engine, EngineConfig};
pub use crate::error::{DescubrirError, Result};
pub use crate::index::FlatIndex;
pub use crate::metrics::{cosine_distance, cosine_similarity, inertia};
pub use crate::primitives::{Matrix, Vector};
pub use crate::recommend::{recommend_for_cart, recommend_for_item, Recommendation, MAX_RECOMMENDATIONS};
pub use crate::render::{GrayRaster, PreviewCache};
