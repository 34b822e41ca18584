use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stowage::backends::{open_cache, open_store};
use stowage::cli::Cli;
use stowage::commands::run;
use stowage::{CacheOptions, Config, Repository};
use stowage_core::entity::Document;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stowage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    tracing::debug!(?config, "Configuration loaded");

    let repo: Repository<Document> = Repository::builder(cli.collection.as_str())
        .ttl(config.cache_ttl)
        .maybe_cache(open_cache(&config).await?)
        .maybe_store(open_store(&config).await?)
        .build();

    let options = CacheOptions {
        key: cli.key,
        ttl: cli.ttl,
    };

    let output = run(&repo, &options, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
