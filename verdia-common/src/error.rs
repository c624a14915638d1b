//! Common error types for Verdia

use thiserror::Error;

/// Common result type for Verdia operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Verdia crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error). The catalog and the
    /// summary cache live in the database, so this is the store-unavailable
    /// condition: callers surface it, they never treat it as a cache miss.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
