use thiserror::Error;

use stowage_core::cache::CacheError;
use stowage_core::hydrate::HydrationError;
use stowage_core::serialization::SerializationError;
use stowage_core::storage::StoreError;

/// Errors surfaced by repository operations.
///
/// Collaborator failures are carried unchanged. A store's not-found report
/// never reaches this type: loads turn it into `None`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Hydration(#[from] HydrationError),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    #[error("Entity in {collection} has no id and no cache key override")]
    MissingId { collection: String },
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_convert() {
        let err: RepositoryError = StoreError::QueryFailed("disk full".to_string()).into();
        assert_eq!(err.to_string(), "Store error: Query failed: disk full");
    }

    #[test]
    fn test_hydration_errors_are_transparent() {
        let err: RepositoryError = HydrationError::NotAnObject {
            entity: "Document",
            found: "array",
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Error hydrating Document: data is not an object (found array)"
        );
    }

    #[test]
    fn test_missing_id_names_collection() {
        let err = RepositoryError::MissingId {
            collection: "users".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Entity in users has no id and no cache key override"
        );
    }
}
