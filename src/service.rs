//! Task orchestration: extract → normalize → persist → notify
//!
//! Single entry point used by the HTTP layer and the scheduler. Failures
//! below this boundary are absorbed and degrade (empty page, skipped
//! row); this module decides the user-visible outcome and publishes one
//! event per run. Nothing escapes it as a raw error.

use crate::events::EventBroadcaster;
use crate::scrape::browser::PageFetcher;
use crate::scrape::{Extractor, SourceRegistry};
use crate::store::BatchStore;
use crate::types::{
    EventStatus, NewBatch, Outcome, Record, RunSummary, ScrapeEvent, StoredBatch,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct ScrapeService {
    registry: SourceRegistry,
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn BatchStore>,
    events: EventBroadcaster,
}

impl ScrapeService {
    pub fn new(
        registry: SourceRegistry,
        fetcher: Arc<dyn PageFetcher>,
        store: Arc<dyn BatchStore>,
        events: EventBroadcaster,
    ) -> Self {
        Self {
            registry,
            fetcher,
            store,
            events,
        }
    }

    /// Registered source names, in registration order.
    pub fn sources(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn events(&self) -> &EventBroadcaster {
        &self.events
    }

    /// Run one complete scrape attempt for `source`.
    ///
    /// Each call is an independent attempt with no retry and no
    /// cancellation. Overlapping runs for the same source are not
    /// serialized; concurrent triggers interleave their events and
    /// batches in unspecified order.
    pub async fn run(&self, source: &str) -> Outcome<RunSummary> {
        let Some(extractor) = self.registry.get(source) else {
            warn!(source, "run rejected: unknown source");
            return Outcome::error(format!("Source '{source}' is not registered."));
        };

        let rows = match self.extract(extractor).await {
            Ok(rows) => rows,
            Err(message) => {
                error!(source, %message, "run failed unexpectedly");
                self.events
                    .publish(&ScrapeEvent::new(EventStatus::Error, source, message.as_str()));
                return Outcome::error(message);
            }
        };

        if rows.is_empty() {
            let message = format!("No data obtained from {source}.");
            warn!(source, "run produced no records");
            self.events
                .publish(&ScrapeEvent::new(EventStatus::Failure, source, message.as_str()));
            return Outcome::warning(message);
        }

        let batch = normalize(source, rows);
        match self.store.save(&batch).await {
            Ok(id) => {
                let message = format!("Saved {} records from {source}.", batch.data.len());
                info!(source, records = batch.data.len(), "run succeeded");
                self.events
                    .publish(&ScrapeEvent::new(EventStatus::Success, source, message.as_str()));
                Outcome::success(
                    message,
                    RunSummary {
                        id,
                        records: batch.data.len(),
                    },
                )
            }
            Err(e) => {
                let message = format!("Failed to save results from {source}: {e}");
                error!(source, error = %e, "persistence failed");
                self.events
                    .publish(&ScrapeEvent::new(EventStatus::Failure, source, message.as_str()));
                Outcome::error(message)
            }
        }
    }

    /// Stored batches, optionally filtered to one source.
    pub async fn results(&self, source: Option<&str>) -> Outcome<Vec<StoredBatch>> {
        match self.store.list(source).await {
            Ok(batches) => Outcome::success("Results retrieved successfully.", batches),
            Err(e) => {
                error!(error = %e, "listing batches failed");
                Outcome::error(format!("Failed to fetch results: {e}"))
            }
        }
    }

    /// Fetch + parse on a dedicated worker thread so the serving loop
    /// stays responsive while the browser session blocks. A page-level
    /// failure degrades to an empty row set inside the worker; only a
    /// worker panic or join failure surfaces as `Err`.
    async fn extract(&self, extractor: Arc<dyn Extractor>) -> Result<Vec<Record>, String> {
        let fetcher = Arc::clone(&self.fetcher);
        tokio::task::spawn_blocking(move || {
            let plan = extractor.plan();
            let html = match fetcher.fetch(&plan) {
                Ok(html) => html,
                Err(e) => {
                    error!(source = extractor.name(), error = %e, "page fetch failed");
                    return Vec::new();
                }
            };
            extractor.parse(&html)
        })
        .await
        .map_err(|e| format!("Scrape worker failed: {e}"))
    }
}

/// Result normalizer: pair the extracted rows with a freshly captured
/// capture timestamp and the source tag.
fn normalize(source: &str, data: Vec<Record>) -> NewBatch {
    NewBatch {
        source: source.to_string(),
        timestamp: Utc::now(),
        data,
    }
}
