//! Core compute primitives (Vector, Matrix).
//!
//! These types are the foundation for catalog storage, clustering,
//! and similarity search.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
