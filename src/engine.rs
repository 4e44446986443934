//! The engine: one-time initialization, then pure-read queries.
//!
//! [`Engine`] is the explicitly constructed context object that the
//! presentation layer talks to. Initialization loads (or receives) the
//! catalog, clusters it into categories, and builds the similarity index;
//! all of that completes before any query can be issued, and nothing is
//! mutated afterwards. Every query method takes `&self`, so one engine
//! can be shared across threads freely.

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::cluster::{Categorizer, CategoryModel, DEFAULT_SEED};
use crate::error::Result;
use crate::index::FlatIndex;
use crate::primitives::Vector;
use crate::recommend::{self, Recommendation};
use std::path::Path;

/// Engine configuration.
///
/// # Examples
///
/// ```
/// use descubrir::engine::EngineConfig;
///
/// let config = EngineConfig::new()
///     .with_n_categories(4)
///     .with_random_state(7);
/// assert_eq!(config.n_categories(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    n_categories: usize,
    random_state: u64,
    max_iter: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    /// Default configuration: 10 categories, fixed seed, 300 iterations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_categories: 10,
            random_state: DEFAULT_SEED,
            max_iter: 300,
        }
    }

    /// Sets the number of categories K.
    #[must_use]
    pub fn with_n_categories(mut self, n_categories: usize) -> Self {
        self.n_categories = n_categories;
        self
    }

    /// Sets the clustering seed.
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

    /// Configured number of categories.
    #[must_use]
    pub fn n_categories(&self) -> usize {
        self.n_categories
    }
}

/// Immutable discovery context: catalog + category model + similarity index.
///
/// # Examples
///
/// ```
/// use descubrir::catalog::Catalog;
/// use descubrir::engine::{Engine, EngineConfig};
///
/// let catalog = Catalog::from_rows(vec![
///     vec![1.0, 0.0, 0.0],
///     vec![0.9, 0.1, 0.0],
///     vec![0.0, 1.0, 0.0],
///     vec![0.0, 0.9, 0.1],
///     vec![0.0, 0.0, 1.0],
/// ]).unwrap();
///
/// let engine = Engine::initialize(catalog, EngineConfig::new().with_n_categories(3)).unwrap();
///
/// assert_eq!(engine.category_names().len(), 3);
/// let recs = engine.recommend_for_item(0).unwrap();
/// assert_eq!(recs.len(), 3);
/// ```
#[derive(Debug)]
pub struct Engine {
    catalog: Catalog,
    categories: CategoryModel,
    index: FlatIndex,
}

impl Engine {
    /// One-time setup: categorizes the catalog and builds the similarity
    /// index. Must complete before any query is served; a failure here is
    /// fatal and no engine is produced.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the configured category count is
    /// 0 or exceeds the catalog size.
    pub fn initialize(catalog: Catalog, config: EngineConfig) -> Result<Self> {
        let categories = Categorizer::new(config.n_categories)
            .with_random_state(config.random_state)
            .with_max_iter(config.max_iter)
            .fit(&catalog)?;
        let index = FlatIndex::build(&catalog);

        Ok(Self {
            catalog,
            categories,
            index,
        })
    }

    /// Loads a catalog from a numeric text file and initializes.
    ///
    /// # Errors
    ///
    /// Returns `Io`/`CatalogLoad` on a bad source, plus any
    /// `initialize` error.
    pub fn load_csv<P: AsRef<Path>>(path: P, config: EngineConfig) -> Result<Self> {
        let catalog = Catalog::load_csv(path)?;
        Self::initialize(catalog, config)
    }

    /// The catalog this engine serves.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Ordered category display names, for building filter UIs.
    #[must_use]
    pub fn category_names(&self) -> &[String] {
        self.categories.names()
    }

    /// Display name of a product's category.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for an index outside the catalog.
    pub fn category_of(&self, product: usize) -> Result<&str> {
        self.categories.name_of(product)
    }

    /// Product indices in the named categories, ascending.
    ///
    /// An empty filter conventionally means "no filter": all indices.
    /// Unknown names contribute nothing.
    #[must_use]
    pub fn indices_by_category(&self, filter: &[&str]) -> Vec<usize> {
        if filter.is_empty() {
            return (0..self.catalog.len()).collect();
        }

        let mut indices: Vec<usize> = filter
            .iter()
            .flat_map(|name| self.categories.indices_with_name(name))
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Up to 3 products similar to the given product, self excluded.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for an index outside the catalog.
    pub fn recommend_for_item(&self, product: usize) -> Result<Vec<Recommendation>> {
        recommend::recommend_for_item(&self.catalog, &self.index, product)
    }

    /// Up to 3 products for the aggregate cart; empty cart yields an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if a cart entry references a product outside
    /// the catalog.
    pub fn recommend_for_cart(&self, cart: &Cart) -> Result<Vec<Recommendation>> {
        recommend::recommend_for_cart(&self.catalog, &self.index, cart)
    }

    /// Raw normalized embedding of a product, for the rendering
    /// collaborator.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for an index outside the catalog.
    pub fn render_preview(&self, product: usize) -> Result<Vector<f64>> {
        self.catalog.embedding_of(product)
    }
}
