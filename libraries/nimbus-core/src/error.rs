/// Core error types for catalog access
use thiserror::Error;

/// Result type alias using `CatalogError`
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised while talking to a remote track catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Connection-level failures (unreachable host, timeout, transport)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status from the catalog
    #[error("Catalog returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// The catalog answered with a failure envelope
    #[error("Catalog rejected request: {0}")]
    Rejected(String),

    /// Requested track does not exist on the catalog
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// Catalog base URL was malformed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl CatalogError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
