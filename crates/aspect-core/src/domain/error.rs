//! Error taxonomy for facade operations.

use aspect_state::StorageError;
use thiserror::Error;

use crate::domain::urn::UrnParseError;

/// Errors surfaced by facade operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Single-entity get targeted a nonexistent entity. The other operations
    /// never raise this; absence there is data, not an error.
    #[error("entity not found: {0}")]
    NotFound(String),

    /// Malformed identifier string or unregistered aspect name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Storage collaborator failure, propagated unchanged.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<UrnParseError> for ResourceError {
    fn from(err: UrnParseError) -> Self {
        ResourceError::InvalidArgument(err.to_string())
    }
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, ResourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = ResourceError::NotFound("urn:dataset:1".to_string());
        assert!(err.to_string().contains("entity not found"));
        assert!(err.to_string().contains("urn:dataset:1"));
    }

    #[test]
    fn urn_parse_error_converts_to_invalid_argument() {
        let parse_err = UrnParseError {
            input: "garbage".to_string(),
            reason: "expected urn: scheme",
        };
        let err: ResourceError = parse_err.into();
        assert!(matches!(err, ResourceError::InvalidArgument(_)));
        assert!(err.to_string().contains("garbage"));
    }

    #[test]
    fn storage_error_propagates_message() {
        let err: ResourceError = StorageError::Backend("engine down".to_string()).into();
        assert!(err.to_string().contains("engine down"));
    }
}
