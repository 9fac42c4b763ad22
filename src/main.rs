//! coinscrape entrypoint
//!
//! Wires config, store, registry, broadcaster, and the HTTP server.

use anyhow::{Context, Result};
use coinscrape::api;
use coinscrape::config::AppConfig;
use coinscrape::events::EventBroadcaster;
use coinscrape::scheduler;
use coinscrape::scrape::browser::ChromeFetcher;
use coinscrape::scrape::SourceRegistry;
use coinscrape::service::ScrapeService;
use coinscrape::store::SledBatchStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    info!(digest = %config.digest(), "configuration loaded");

    let registry = SourceRegistry::standard()?;
    let store =
        SledBatchStore::open(&config.persistence.data_dir).context("opening batch store")?;
    let fetcher = ChromeFetcher::new(Duration::from_secs(config.scrape.page_timeout_secs));
    let events = EventBroadcaster::new(config.events.capacity);

    let service = Arc::new(ScrapeService::new(
        registry,
        Arc::new(fetcher),
        Arc::new(store),
        events,
    ));

    if config.scheduler.enabled {
        scheduler::spawn(
            Arc::clone(&service),
            Duration::from_secs(config.scheduler.interval_secs),
        );
        info!(interval_secs = config.scheduler.interval_secs, "scheduler enabled");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "coinscrape listening");

    axum::serve(listener, api::create_router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
