//! Error types for tailmind-agents

use thiserror::Error;

/// Agent error type
#[derive(Debug, Error)]
pub enum Error {
    /// No agent registered under the requested name
    #[error("agent not found: {0}")]
    NotFound(String),

    /// An agent with this name is already registered
    #[error("agent already registered: {0}")]
    AlreadyRegistered(String),

    /// Handler invocation failed (network, upstream model, storage, ...)
    #[error("invocation failed: {0}")]
    Invocation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
