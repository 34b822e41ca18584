use thiserror::Error;

/// Errors that can occur during persistent-store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Document not found in {collection}: {id}")]
    NotFound { collection: String, id: String },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Builds a not-found error for `id` in `collection`.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Returns true for the "no such document" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type for persistent-store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_not_found_display() {
        let error = StoreError::not_found("users", "u1");
        assert_eq!(error.to_string(), "Document not found in users: u1");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_store_error_connection_failed_display() {
        let error = StoreError::ConnectionFailed("timeout after 30s".to_string());
        assert_eq!(error.to_string(), "Connection failed: timeout after 30s");
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_store_error_query_failed_display() {
        let error = StoreError::QueryFailed("no such table".to_string());
        assert_eq!(error.to_string(), "Query failed: no such table");
    }

    #[test]
    fn test_store_error_serialization_display() {
        let error = StoreError::Serialization("trailing comma".to_string());
        assert_eq!(error.to_string(), "Serialization error: trailing comma");
    }

    #[test]
    fn test_store_error_invalid_data_display() {
        let error = StoreError::InvalidData("_id must be a string".to_string());
        assert_eq!(error.to_string(), "Invalid data: _id must be a string");
    }
}
