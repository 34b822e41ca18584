//! CLI command definitions.

use clap::{Parser, Subcommand};
use serde_json::Value;

use stowage_core::cache::Ttl;
use stowage_core::storage::DEFAULT_SEARCH_SIZE;

/// Inspect and edit documents through a cache-aside repository.
#[derive(Debug, Parser)]
#[command(name = "stowage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Collection to operate on.
    #[arg(long, short, env = "STOWAGE_COLLECTION", default_value = "documents")]
    pub collection: String,

    /// Cache key override for single-document commands.
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// TTL override in seconds, or `never`.
    #[arg(long, global = true)]
    pub ttl: Option<Ttl>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load a document, cache first.
    Get {
        /// Document ID.
        id: String,
    },
    /// Upsert a JSON object into the store.
    Put {
        /// Document as a JSON object; `_id` selects the document to replace.
        json: String,
        /// Also write the document into the cache.
        #[arg(long)]
        cache: bool,
    },
    /// Load several documents from the store.
    Mget {
        /// Document IDs.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Re-arm the cache TTL of a document.
    Touch {
        /// Document ID.
        id: String,
    },
    /// Remove a document from the cache.
    Evict {
        /// Document ID.
        id: String,
    },
    /// Search the store with equality filters.
    Search {
        /// Filters as `field=value`; values are read as JSON when they parse.
        #[arg(value_parser = parse_filter)]
        filters: Vec<(String, Value)>,
        /// Offset of the first hit.
        #[arg(long, default_value = "0")]
        from: usize,
        /// Maximum number of hits.
        #[arg(long, default_value_t = DEFAULT_SEARCH_SIZE)]
        size: usize,
    },
}

/// Parses a `field=value` search filter.
pub fn parse_filter(s: &str) -> Result<(String, Value), String> {
    let (field, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid filter '{s}': expected field=value"))?;
    if field.is_empty() {
        return Err(format!("invalid filter '{s}': empty field name"));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((field.to_string(), value))
}
