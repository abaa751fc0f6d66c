//! Data loading errors

use thiserror::Error;

/// Failure while loading a dataset.
///
/// Payloads are plain strings so a failure can be cached and handed out to
/// every later caller of the same key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The server answered with a non-success status
    #[error("HTTP {status} fetching {url}")]
    Http {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// The request never produced a response
    #[error("Network error fetching {url}: {message}")]
    Network {
        /// Requested URL
        url: String,
        /// Transport error text
        message: String,
    },

    /// A local dataset file does not exist
    #[error("Dataset not found: {path}")]
    Missing {
        /// File path
        path: String,
    },

    /// A local dataset file could not be read
    #[error("Could not read {path}: {message}")]
    Io {
        /// File path
        path: String,
        /// I/O error text
        message: String,
    },

    /// The dataset was fetched but is not the expected JSON
    #[error("Could not parse {path}: {message}")]
    Parse {
        /// Dataset path relative to the data root
        path: String,
        /// JSON error text
        message: String,
    },

    /// The HTTP client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    /// The cache was cleared or the context changed while the load was in flight
    #[error("Load superseded by a newer context")]
    Superseded,
}

impl LoadError {
    /// Whether the error means the record set simply does not exist
    /// (404 or missing file) rather than a transient failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status == 404,
            Self::Missing { .. } => true,
            _ => false,
        }
    }
}
