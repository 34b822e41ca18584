//! Executes CLI commands against a document repository.

use anyhow::{bail, Context};
use serde_json::{json, Value};

use stowage_core::entity::{Document, Entity};
use stowage_core::hydrate::hydrate;
use stowage_core::storage::SearchQuery;

use crate::cli::Commands;
use crate::repository::{CacheOptions, Repository};

/// Runs `command` and returns its JSON output.
pub async fn run(
    repo: &Repository<Document>,
    options: &CacheOptions,
    command: Commands,
) -> anyhow::Result<Value> {
    match command {
        Commands::Get { id } => {
            let document = get(repo, options, &id).await?;
            if document.is_none() {
                tracing::info!(collection = repo.collection(), %id, "Document not found");
            }
            Ok(document.map_or(Value::Null, |doc| Value::Object(doc.to_record())))
        }
        Commands::Put { json, cache } => {
            let value: Value = serde_json::from_str(&json).context("Document is not valid JSON")?;
            let mut document = Document::default();
            hydrate(&mut document, value)?;

            let Some(result) = repo.persist_to_store(&document).await? else {
                bail!("No persistent store configured for {}", repo.collection());
            };
            if cache {
                if document.id.is_none() {
                    document.id = Some(result.id.clone());
                }
                repo.persist_to_cache_with(&document, options).await?;
            }
            Ok(serde_json::to_value(result)?)
        }
        Commands::Mget { ids } => {
            let documents = repo.load_many(&ids).await?;
            Ok(Value::Array(
                documents
                    .iter()
                    .map(|doc| Value::Object(doc.to_record()))
                    .collect(),
            ))
        }
        Commands::Touch { id } => {
            repo.refresh_ttl_with(&Document::new(id.as_str()), options)
                .await?;
            Ok(json!({ "touched": id }))
        }
        Commands::Evict { id } => {
            repo.evict_from_cache(&Document::new(id.as_str()), options)
                .await?;
            Ok(json!({ "evicted": id }))
        }
        Commands::Search {
            filters,
            from,
            size,
        } => {
            let query = filters
                .into_iter()
                .fold(SearchQuery::all(), |query, (field, value)| {
                    query.filter(field, value)
                })
                .from(from)
                .size(size);
            let page = repo.search(&query).await?;
            Ok(json!({
                "total": page.total,
                "hits": page
                    .entities
                    .iter()
                    .map(|doc| Value::Object(doc.to_record()))
                    .collect::<Vec<_>>(),
            }))
        }
    }
}

/// Cache-aside load with the cache maintenance awaited in place.
///
/// [`Repository::load_with`] detaches the TTL refresh and write-back, which a
/// short-lived process would drop on exit. Cache maintenance failures are
/// logged and do not fail the command.
async fn get(
    repo: &Repository<Document>,
    options: &CacheOptions,
    id: &str,
) -> anyhow::Result<Option<Document>> {
    let addressed = Document::new(id);

    if let Some(document) = repo.load_from_cache(id, options).await? {
        if let Err(err) = repo.refresh_ttl_with(&addressed, options).await {
            tracing::warn!(%id, error = %err, "Failed to refresh cache TTL");
        }
        return Ok(Some(document));
    }

    let Some(document) = repo.load_one_from_store(id).await? else {
        return Ok(None);
    };
    if let Err(err) = repo.persist_to_cache_with(&document, options).await {
        tracing::warn!(%id, error = %err, "Failed to write document back to cache");
    }
    Ok(Some(document))
}
