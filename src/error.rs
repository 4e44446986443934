//! Error types for descubrir operations.
//!
//! Startup-phase failures (catalog load, invalid configuration) are fatal
//! and abort initialization; per-call failures are returned to the caller
//! as structured values and never leave shared state inconsistent.

use std::fmt;

/// Main error type for descubrir operations.
///
/// # Examples
///
/// ```
/// use descubrir::error::DescubrirError;
///
/// let err = DescubrirError::OutOfRange { index: 12, len: 10 };
/// assert!(err.to_string().contains("out of range"));
/// ```
#[derive(Debug)]
pub enum DescubrirError {
    /// Catalog source was malformed or empty. Fatal at startup.
    CatalogLoad {
        /// Failure description
        message: String,
    },

    /// Invalid configuration value (e.g. more categories than items).
    /// Fatal at startup.
    InvalidConfiguration {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Product index outside `[0, N)`. Recoverable.
    OutOfRange {
        /// Offending index
        index: usize,
        /// Catalog length
        len: usize,
    },

    /// Invalid per-call argument (e.g. `k == 0`). Recoverable.
    InvalidArgument {
        /// Failure description
        message: String,
    },

    /// The similarity index holds no vectors. Recoverable.
    EmptyIndex,

    /// The cart holds no quantity; there is nothing to aggregate.
    /// Recoverable, equivalent to "no recommendations available".
    EmptyCart,

    /// I/O error while reading a catalog source.
    Io(std::io::Error),
}

impl fmt::Display for DescubrirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescubrirError::CatalogLoad { message } => {
                write!(f, "Catalog load failed: {message}")
            }
            DescubrirError::InvalidConfiguration {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid configuration: {param} = {value}, expected {constraint}"
                )
            }
            DescubrirError::OutOfRange { index, len } => {
                write!(f, "Product index {index} out of range (catalog len = {len})")
            }
            DescubrirError::InvalidArgument { message } => {
                write!(f, "Invalid argument: {message}")
            }
            DescubrirError::EmptyIndex => write!(f, "Similarity index is empty"),
            DescubrirError::EmptyCart => write!(f, "Cart is empty"),
            DescubrirError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for DescubrirError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DescubrirError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DescubrirError {
    fn from(err: std::io::Error) -> Self {
        DescubrirError::Io(err)
    }
}

impl DescubrirError {
    /// Create a catalog load error with descriptive context.
    #[must_use]
    pub fn catalog_load(message: impl Into<String>) -> Self {
        Self::CatalogLoad {
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an out-of-range error for a product index.
    #[must_use]
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, DescubrirError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_load_display() {
        let err = DescubrirError::catalog_load("row 3 has 5 values, expected 4");
        let msg = err.to_string();
        assert!(msg.contains("Catalog load failed"));
        assert!(msg.contains("row 3"));
    }

    #[test]
    fn test_invalid_configuration_display() {
        let err = DescubrirError::InvalidConfiguration {
            param: "n_categories".to_string(),
            value: "12".to_string(),
            constraint: "<= number of catalog items (5)".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid configuration"));
        assert!(msg.contains("n_categories"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn test_out_of_range_display() {
        let err = DescubrirError::out_of_range(7, 5);
        let msg = err.to_string();
        assert!(msg.contains("index 7"));
        assert!(msg.contains("len = 5"));
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = DescubrirError::invalid_argument("k must be >= 1");
        assert!(err.to_string().contains("k must be >= 1"));
    }

    #[test]
    fn test_empty_variants_display() {
        assert!(DescubrirError::EmptyIndex.to_string().contains("index"));
        assert!(DescubrirError::EmptyCart.to_string().contains("Cart"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing catalog");
        let err: DescubrirError = io_err.into();
        assert!(matches!(err, DescubrirError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_source() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(DescubrirError::Io(io_err).source().is_some());
        assert!(DescubrirError::EmptyCart.source().is_none());
    }
}
