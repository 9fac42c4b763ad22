//! Scraping: page plans, per-source extractors, and the source registry

pub mod browser;
pub mod clean;
pub mod sources;

use crate::types::Record;
use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::Duration;

/// How the browser prepares a page before the content is read.
#[derive(Debug, Clone)]
pub struct PagePlan {
    /// Navigation target.
    pub url: &'static str,
    /// Wait after load so client-side rendering settles.
    pub settle: Duration,
    /// Scroll to the bottom first to trigger lazy-loaded rows.
    pub scroll_to_bottom: bool,
}

/// One scrapable site: a page plan plus selector logic over rendered HTML.
pub trait Extractor: Send + Sync {
    /// Source name; uniquely identifies the extractor and its batches.
    fn name(&self) -> &'static str;

    /// Browser preparation for this site.
    fn plan(&self) -> PagePlan;

    /// Extract up to [`crate::types::MAX_ROWS`] valid records from the
    /// rendered page. Malformed rows are logged and skipped; a page that
    /// matches nothing yields an empty vec, never an error.
    fn parse(&self, html: &str) -> Vec<Record>;
}

/// Registered extractors. Lookup is by source name; registration order is
/// the order reported to clients.
pub struct SourceRegistry {
    extractors: Vec<Arc<dyn Extractor>>,
}

impl SourceRegistry {
    /// Build a registry, rejecting duplicate source names at startup.
    pub fn new(extractors: Vec<Arc<dyn Extractor>>) -> Result<Self> {
        for (i, extractor) in extractors.iter().enumerate() {
            if extractors[..i].iter().any(|e| e.name() == extractor.name()) {
                bail!(
                    "duplicate extractor registered for source '{}'",
                    extractor.name()
                );
            }
        }
        Ok(Self { extractors })
    }

    /// The production source set.
    pub fn standard() -> Result<Self> {
        Self::new(vec![
            Arc::new(sources::CoinGecko),
            Arc::new(sources::Coinmarketcap),
            Arc::new(sources::WorldCoinIndex),
        ])
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Extractor>> {
        self.extractors
            .iter()
            .find(|e| e.name() == name)
            .map(Arc::clone)
    }

    pub fn names(&self) -> Vec<String> {
        self.extractors.iter().map(|e| e.name().to_string()).collect()
    }
}
