//! SQLite store implementation.
//!
//! Implements `DocumentStore` from `stowage_core::storage` using SQLite.

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use stowage_core::record::{Record, StoreResponse};
use stowage_core::storage::{
    DocumentStore, MultiGetItem, PersistResult, Result, SearchQuery, SearchResult, StoreError,
};

use super::conversions::{
    document_to_response, format_source, now_timestamp, parse_source, row_to_document,
    version_from_sql, DocumentRow,
};
use super::error::map_tokio_rusqlite_error;
use super::schema;
use crate::storage::split_record;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based document store.
///
/// Provides async access to SQLite storage for every collection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates a new store with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new store with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get(&self, collection: &str, id: &str) -> Result<StoreResponse> {
        let collection_str = collection.to_string();
        let id_str = id.to_string();

        let row: Option<DocumentRow> = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_DOCUMENT).map_err(wrap_err)?;
                let row = stmt
                    .query_row([&collection_str, &id_str], row_to_document)
                    .optional()
                    .map_err(wrap_err)?;
                Ok(row)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, collection, id))?;

        match row {
            Some(row) => document_to_response(row),
            None => Err(StoreError::not_found(collection, id)),
        }
    }

    async fn mget(&self, collection: &str, ids: &[String]) -> Result<Vec<MultiGetItem>> {
        let collection_str = collection.to_string();
        let ids_vec = ids.to_vec();

        let rows: Vec<(String, Option<String>)> = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_DOCUMENT).map_err(wrap_err)?;
                let mut rows = Vec::with_capacity(ids_vec.len());
                for id in ids_vec {
                    let source = stmt
                        .query_row([&collection_str, &id], |row| row.get::<_, String>(2))
                        .optional()
                        .map_err(wrap_err)?;
                    rows.push((id, source));
                }
                Ok(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, collection, "unknown"))?;

        rows.into_iter()
            .map(|(id, source)| match source {
                Some(source) => Ok(MultiGetItem::found(
                    id,
                    serde_json::Value::Object(parse_source(&source)?),
                )),
                None => Ok(MultiGetItem::missing(id)),
            })
            .collect()
    }

    async fn upsert(&self, collection: &str, record: Record) -> Result<PersistResult> {
        let (id, source) = split_record(record)?;
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let source_json = format_source(&source)?;
        let updated_at = now_timestamp();
        let collection_str = collection.to_string();
        let id_str = id.clone();

        let (version, created) = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let existing: Option<i64> = tx
                    .query_row(schema::SELECT_VERSION, [&collection_str, &id_str], |row| {
                        row.get(0)
                    })
                    .optional()
                    .map_err(wrap_err)?;

                let (version, created) = match existing {
                    Some(current) => {
                        let next = current + 1;
                        tx.execute(
                            schema::UPDATE_DOCUMENT,
                            rusqlite::params![collection_str, id_str, next, source_json, updated_at],
                        )
                        .map_err(wrap_err)?;
                        (next, false)
                    }
                    None => {
                        tx.execute(
                            schema::INSERT_DOCUMENT,
                            rusqlite::params![collection_str, id_str, 1_i64, source_json, updated_at],
                        )
                        .map_err(wrap_err)?;
                        (1, true)
                    }
                };

                tx.commit().map_err(wrap_err)?;
                Ok((version, created))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, collection, &id))?;

        tracing::debug!(%collection, %id, version, created, "Document upserted");

        Ok(PersistResult {
            id,
            version: version_from_sql(version),
            created,
        })
    }

    async fn search(&self, collection: &str, query: &SearchQuery) -> Result<SearchResult> {
        let collection_str = collection.to_string();

        let rows: Vec<DocumentRow> = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_COLLECTION).map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&collection_str], row_to_document)
                    .map_err(wrap_err)?;

                let mut documents = Vec::new();
                for row_result in rows {
                    documents.push(row_result.map_err(wrap_err)?);
                }
                Ok(documents)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, collection, "unknown"))?;

        let mut matching = Vec::new();
        for row in rows {
            let response = document_to_response(row)?;
            let matches = match response.source() {
                serde_json::Value::Object(source) => query.matches(source),
                _ => false,
            };
            if matches {
                matching.push(response);
            }
        }
        let total = matching.len();

        Ok(SearchResult {
            hits: query.paginate(matching),
            total,
        })
    }
}
