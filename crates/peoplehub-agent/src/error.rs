// Error types for the assistant pipeline
//
// Per-action failures never use these types; they become failed
// `ActionResult`s. `AgentError` covers what can abort a whole turn.

use thiserror::Error;

/// Result type for assistant operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Assistant errors
#[derive(Debug, Error)]
pub enum AgentError {
    /// The completion model failed
    #[error("Model error: {0}")]
    Model(#[from] peoplehub_abstraction::ModelError),

    /// The data store failed while resolving the actor or building context
    #[error("Storage error: {0}")]
    Storage(#[from] peoplehub_core::StorageError),
}
