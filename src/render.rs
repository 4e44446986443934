//! Preview rendering support for the display collaborator.
//!
//! Rendering an embedding to a raster is deterministic and repeatable, so
//! the collaborator caches rendered previews keyed by product index. The
//! cache is explicitly bounded with LRU eviction; it never grows past its
//! configured capacity.

use crate::primitives::Vector;
use std::collections::HashMap;

/// Default preview cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// A grayscale raster rendered from an embedding.
///
/// Embeddings with a perfect-square dimension reshape to a square image
/// (the flattened-pixels case); anything else renders as a single row.
/// Intensities in [0, 1] map linearly onto u8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayRaster {
    /// Raster width in pixels.
    pub width: usize,
    /// Raster height in pixels.
    pub height: usize,
    /// Row-major pixel intensities.
    pub pixels: Vec<u8>,
}

impl GrayRaster {
    /// Renders an embedding into a grayscale raster.
    #[must_use]
    pub fn from_embedding(embedding: &Vector<f64>) -> Self {
        let len = embedding.len();
        let side = (len as f64).sqrt().round() as usize;
        let (width, height) = if side * side == len && len > 0 {
            (side, side)
        } else {
            (len, 1)
        };

        let pixels = embedding
            .as_slice()
            .iter()
            .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect();

        Self {
            width,
            height,
            pixels,
        }
    }
}

/// Bounded LRU cache of rendered previews, keyed by product index.
///
/// # Examples
///
/// ```
/// use descubrir::render::{GrayRaster, PreviewCache};
/// use descubrir::primitives::Vector;
///
/// let mut cache = PreviewCache::new(2);
/// let e = Vector::from_slice(&[0.0, 1.0, 0.5, 0.25]);
///
/// let raster = cache.get_or_render_with(7, || GrayRaster::from_embedding(&e));
/// assert_eq!(raster.width, 2);
/// assert!(cache.contains(7));
/// ```
#[derive(Debug)]
pub struct PreviewCache {
    capacity: usize,
    entries: HashMap<usize, CacheEntry>,
    clock: u64,
}

#[derive(Debug)]
struct CacheEntry {
    raster: GrayRaster,
    last_access: u64,
}

impl PreviewCache {
    /// Creates a cache holding at most `capacity` previews.
    /// A zero capacity is bumped to 1.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            clock: 0,
        }
    }

    /// Creates a cache with the default capacity.
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cached previews.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if a preview for the product is cached.
    #[must_use]
    pub fn contains(&self, product: usize) -> bool {
        self.entries.contains_key(&product)
    }

    /// Returns the cached preview for a product, rendering and caching it
    /// on a miss. Evicts the least recently used entry when full.
    pub fn get_or_render_with<F>(&mut self, product: usize, render: F) -> &GrayRaster
    where
        F: FnOnce() -> GrayRaster,
    {
        self.clock += 1;
        let clock = self.clock;

        if !self.entries.contains_key(&product) {
            if self.entries.len() >= self.capacity {
                self.evict_lru();
            }
            self.entries.insert(
                product,
                CacheEntry {
                    raster: render(),
                    last_access: clock,
                },
            );
        }

        let entry = self
            .entries
            .get_mut(&product)
            .expect("entry just inserted or already present");
        entry.last_access = clock;
        &entry.raster
    }

    fn evict_lru(&mut self) {
        if let Some(&oldest) = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(product, _)| product)
        {
            self.entries.remove(&oldest);
        }
    }
}
