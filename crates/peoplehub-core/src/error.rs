//! Error types for PeopleHub Core.

use crate::config::ConfigError;
use crate::models::DomainError;
use crate::storage::StorageError;
use thiserror::Error;

/// Core error type for PeopleHub operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Domain validation errors
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for PeopleHub core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
