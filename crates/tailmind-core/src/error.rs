//! Error types for tailmind-core
//!
//! Decision-service and handler failures are contained inside the turn and
//! never surface through this enum; it exists for wiring errors caught at
//! construction time.

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
