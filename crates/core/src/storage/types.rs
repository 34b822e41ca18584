use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::{Record, StoreResponse};

/// Page size used when a search does not ask for one.
pub const DEFAULT_SEARCH_SIZE: usize = 10;

/// One entry of a multi-get response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiGetItem {
    pub id: String,
    pub found: bool,
    /// Source payload; `None` when the document was not found.
    pub source: Option<Value>,
}

impl MultiGetItem {
    /// A found document.
    pub fn found(id: impl Into<String>, source: Value) -> Self {
        Self {
            id: id.into(),
            found: true,
            source: Some(source),
        }
    }

    /// A document that does not exist.
    pub fn missing(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            found: false,
            source: None,
        }
    }
}

/// Outcome of an upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistResult {
    pub id: String,
    pub version: u64,
    /// True when the document did not exist before.
    pub created: bool,
}

/// Equality filters on top-level source fields, with pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub filters: Record,
    pub from: usize,
    pub size: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            filters: Record::new(),
            from: 0,
            size: DEFAULT_SEARCH_SIZE,
        }
    }
}

impl SearchQuery {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Requires `field` to equal `value`.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    /// Skips the first `from` hits.
    pub fn from(mut self, from: usize) -> Self {
        self.from = from;
        self
    }

    /// Returns at most `size` hits.
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Returns true when every filter matches the source payload.
    pub fn matches(&self, source: &Record) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| source.get(field) == Some(expected))
    }

    /// Applies `from`/`size` to an ordered list of hits.
    pub fn paginate<T>(&self, hits: Vec<T>) -> Vec<T> {
        hits.into_iter().skip(self.from).take(self.size).collect()
    }
}

/// A page of search hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub hits: Vec<StoreResponse>,
    /// Number of matching documents before pagination.
    pub total: usize,
}

impl SearchResult {
    /// A result with no hits.
    pub fn empty() -> Self {
        Self {
            hits: Vec::new(),
            total: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(value: Value) -> Record {
        match value {
            Value::Object(record) => record,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(SearchQuery::all().matches(&source(json!({"a": 1}))));
        assert!(SearchQuery::all().matches(&Record::new()));
    }

    #[test]
    fn test_filters_require_equality() {
        let query = SearchQuery::all().filter("role", "admin");

        assert!(query.matches(&source(json!({"role": "admin", "x": 1}))));
        assert!(!query.matches(&source(json!({"role": "user"}))));
        assert!(!query.matches(&source(json!({}))));
    }

    #[test]
    fn test_paginate() {
        let query = SearchQuery::all().from(1).size(2);

        assert_eq!(query.paginate(vec![1, 2, 3, 4]), vec![2, 3]);
        assert_eq!(query.paginate(vec![1]), Vec::<i32>::new());
    }

    #[test]
    fn test_default_size() {
        assert_eq!(SearchQuery::default().size, DEFAULT_SEARCH_SIZE);
        assert_eq!(SearchQuery::default().from, 0);
    }

    #[test]
    fn test_multi_get_item_constructors() {
        let found = MultiGetItem::found("u1", json!({"a": 1}));
        let missing = MultiGetItem::missing("u2");

        assert!(found.found);
        assert_eq!(found.source, Some(json!({"a": 1})));
        assert!(!missing.found);
        assert_eq!(missing.source, None);
    }
}
