/// Separator between the collection name and the entity id in a cache key.
pub const KEY_SEPARATOR: char = '/';

/// Returns the default cache key of an entity: `<collection>/<id>`.
///
/// # Examples
///
/// ```
/// use stowage_core::cache::cache_key;
///
/// assert_eq!(cache_key("users", "u1"), "users/u1");
/// ```
pub fn cache_key(collection: &str, id: &str) -> String {
    format!("{collection}{KEY_SEPARATOR}{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key() {
        assert_eq!(cache_key("users", "u1"), "users/u1");
    }

    #[test]
    fn test_cache_key_keeps_nested_collection_names() {
        assert_eq!(cache_key("_internal/profiles", "admin"), "_internal/profiles/admin");
    }

    #[test]
    fn test_cache_key_is_pure() {
        assert_eq!(cache_key("profiles", "p-9"), cache_key("profiles", "p-9"));
    }
}
