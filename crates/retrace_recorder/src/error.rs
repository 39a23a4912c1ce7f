//! Error types for retrace_recorder

use retrace_core::{GradientId, SurfaceError};
use thiserror::Error;

/// Errors that can occur while recording or replaying
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// The wrapped surface has no such operation
    #[error("surface has no operation named `{0}`")]
    UnknownOperation(String),

    /// The wrapped surface has no such property
    #[error("surface has no property named `{0}`")]
    UnknownProperty(String),

    /// A replay bound does not match any log entry
    #[error("no log entry with index {0}")]
    UnknownIndex(u64),

    /// A gradient reference that this recorder never handed out
    #[error("unknown {0}")]
    UnknownGradient(GradientId),

    /// Failure reported by the surface itself, passed through unchanged
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Result type for retrace_recorder operations
pub type Result<T> = std::result::Result<T, CacheError>;
