//! Error types for sqlrig

use thiserror::Error;

/// Result type alias for sqlrig operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum Error {
    /// A comparison was constructed from parts that do not fit any
    /// supported shape (e.g. BETWEEN without exactly two bounds).
    #[error("Malformed comparison: {0}")]
    MalformedComparison(String),

    /// Local validation error (e.g. placeholder/argument count mismatch)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Driver-level execution error, propagated unchanged
    #[error("Driver error: {0}")]
    Driver(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a malformed-comparison error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedComparison(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a driver error
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver(message.into())
    }

    /// Check if this is a malformed-comparison error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedComparison(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
