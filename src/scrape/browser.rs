//! Headless browser session for fetching rendered pages
//!
//! One Chromium process per fetch: launch, navigate, optionally scroll,
//! settle, read the DOM, tear down. Blocking by design; the orchestrator
//! runs this on a worker thread.

use super::PagePlan;
use anyhow::{anyhow, Context, Result};
use headless_chrome::{Browser, LaunchOptions};
use std::time::Duration;
use tracing::debug;

/// Produces the rendered HTML for a page plan.
///
/// The trait seam keeps extraction logic testable without a browser.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, plan: &PagePlan) -> Result<String>;
}

/// Production fetcher driving headless Chromium.
///
/// The session is scoped to a single call and torn down unconditionally
/// when the call returns, including on error. No pooling or reuse, so
/// every fetch pays full browser-startup cost.
pub struct ChromeFetcher {
    page_timeout: Duration,
}

impl ChromeFetcher {
    pub fn new(page_timeout: Duration) -> Self {
        Self { page_timeout }
    }
}

impl PageFetcher for ChromeFetcher {
    fn fetch(&self, plan: &PagePlan) -> Result<String> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .map_err(|e| anyhow!("building browser launch options: {e}"))?;

        // Dropping `browser` at the end of this scope kills the Chromium
        // process, on the error paths too.
        let browser = Browser::new(options).context("launching headless browser")?;
        let tab = browser.new_tab().context("opening tab")?;
        tab.set_default_timeout(self.page_timeout);

        tab.navigate_to(plan.url)
            .with_context(|| format!("navigating to {}", plan.url))?;
        tab.wait_until_navigated()
            .with_context(|| format!("waiting for {} to load", plan.url))?;

        if plan.scroll_to_bottom {
            tab.evaluate("window.scrollTo(0, document.body.scrollHeight)", false)
                .context("scrolling to bottom")?;
        }
        if !plan.settle.is_zero() {
            std::thread::sleep(plan.settle);
        }

        let html = tab.get_content().context("reading page content")?;
        debug!(url = plan.url, bytes = html.len(), "page fetched");
        Ok(html)
    }
}
