//! Errors raised by drawing surfaces

use thiserror::Error;

use crate::value::LiveGradient;

/// Errors a [`Surface`](crate::Surface) reports for its own operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// No operation or property of that name
    #[error("surface has no member named `{0}`")]
    UnknownMember(String),

    /// Arguments did not fit the operation
    #[error("invalid arguments to `{operation}`: {reason}")]
    InvalidArgument { operation: String, reason: String },

    /// A property or argument had the wrong kind of value
    #[error("`{member}` expects a {expected} value")]
    TypeMismatch {
        member: String,
        expected: &'static str,
    },

    /// The gradient key is not owned by this surface
    #[error("surface does not own gradient {0:?}")]
    UnknownGradient(LiveGradient),
}

impl SurfaceError {
    pub fn invalid_argument(operation: &str, reason: impl Into<String>) -> Self {
        SurfaceError::InvalidArgument {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub fn type_mismatch(member: &str, expected: &'static str) -> Self {
        SurfaceError::TypeMismatch {
            member: member.to_string(),
            expected,
        }
    }
}
