//! Error types for the storage boundary.

use thiserror::Error;

/// Errors produced by the storage collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend failure (connection, query, I/O).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A write was rejected by the engine.
    #[error("write rejected for {urn}: {reason}")]
    WriteRejected { urn: String, reason: String },

    /// Payload (de)serialization failed inside a backend.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_display() {
        let err = StorageError::Backend("connection refused".to_string());
        assert!(err.to_string().contains("storage backend error"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn write_rejected_names_urn_and_reason() {
        let err = StorageError::WriteRejected {
            urn: "urn:test:1".to_string(),
            reason: "quota exceeded".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("urn:test:1"));
        assert!(msg.contains("quota exceeded"));
    }
}
