//! Shopping cart state and the cart aggregator.
//!
//! The cart is owned by the calling session, not by the engine: the core
//! receives a snapshot per call and never retains it. The one piece of
//! cart math the core depends on is [`Cart::centroid`], the
//! quantity-weighted mean embedding that drives cart recommendations.

use crate::catalog::Catalog;
use crate::error::{DescubrirError, Result};
use crate::primitives::Vector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::SystemTime;

/// One cart line: a product, how many of it, and when it first went in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product index into the catalog.
    pub product: usize,
    /// Units of this product, always >= 1 while the entry exists.
    pub quantity: u32,
    /// When the product was first added.
    pub added_at: SystemTime,
}

/// A shopping cart keyed by product index.
///
/// At most one entry per product: adding an existing product accumulates
/// quantity, removing decrements and deletes the entry at zero.
///
/// # Examples
///
/// ```
/// use descubrir::cart::Cart;
///
/// let mut cart = Cart::new();
/// cart.add(3);
/// cart.add(3);
/// cart.add(7);
///
/// assert_eq!(cart.quantity_of(3), 2);
/// assert_eq!(cart.total_quantity(), 3);
///
/// cart.remove(3);
/// cart.remove(3);
/// assert_eq!(cart.quantity_of(3), 0);
/// assert_eq!(cart.distinct_products(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    items: BTreeMap<usize, CartItem>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of a product, inserting a new entry if needed.
    pub fn add(&mut self, product: usize) {
        self.add_n(product, 1);
    }

    /// Adds `quantity` units of a product. Zero is a no-op.
    pub fn add_n(&mut self, product: usize, quantity: u32) {
        if quantity == 0 {
            return;
        }
        self.items
            .entry(product)
            .and_modify(|item| item.quantity += quantity)
            .or_insert_with(|| CartItem {
                product,
                quantity,
                added_at: SystemTime::now(),
            });
    }

    /// Removes one unit of a product, deleting the entry at quantity zero.
    /// Removing an absent product is a no-op.
    pub fn remove(&mut self, product: usize) {
        if let Some(item) = self.items.get_mut(&product) {
            if item.quantity > 1 {
                item.quantity -= 1;
            } else {
                self.items.remove(&product);
            }
        }
    }

    /// Units of the given product currently in the cart (0 if absent).
    #[must_use]
    pub fn quantity_of(&self, product: usize) -> u32 {
        self.items.get(&product).map_or(0, |item| item.quantity)
    }

    /// Total units across all entries.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.values().map(|item| item.quantity).sum()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn distinct_products(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart holds no quantity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates entries in ascending product order.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.values()
    }

    /// Computes the quantity-weighted centroid embedding of the cart:
    /// `sum(quantity_i * embedding_i) / sum(quantity_i)`.
    ///
    /// # Errors
    ///
    /// - `EmptyCart` if total quantity is 0
    /// - `OutOfRange` if an entry references a product outside the catalog
    pub fn centroid(&self, catalog: &Catalog) -> Result<Vector<f64>> {
        if self.is_empty() {
            return Err(DescubrirError::EmptyCart);
        }

        let mut acc = Vector::zeros(catalog.dim());
        let mut total = 0u32;
        for item in self.iter() {
            let embedding = catalog.embedding_of(item.product)?;
            acc.axpy(f64::from(item.quantity), &embedding);
            total += item.quantity;
        }

        acc.scale_inv(f64::from(total));
        Ok(acc)
    }
}
