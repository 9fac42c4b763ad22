//! Shared harness for integration tests: stub fetchers, a temp-backed
//! service, and rendered-HTML fixtures shaped like the scraped sites.

// Each test binary uses a different subset of this harness.
#![allow(dead_code)]

use coinscrape::events::EventBroadcaster;
use coinscrape::scrape::browser::PageFetcher;
use coinscrape::scrape::{PagePlan, SourceRegistry};
use coinscrape::service::ScrapeService;
use coinscrape::store::SledBatchStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Serves a fixed HTML document instead of launching a browser, counting
/// how many times it was asked to fetch.
pub struct StaticFetcher {
    html: String,
    calls: Arc<AtomicUsize>,
}

impl StaticFetcher {
    pub fn new(html: impl Into<String>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                html: html.into(),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl PageFetcher for StaticFetcher {
    fn fetch(&self, _plan: &PagePlan) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.html.clone())
    }
}

/// Fails every fetch the way a navigation error would.
pub struct FailingFetcher;

impl PageFetcher for FailingFetcher {
    fn fetch(&self, _plan: &PagePlan) -> anyhow::Result<String> {
        anyhow::bail!("net::ERR_NAME_NOT_RESOLVED")
    }
}

/// Panics inside the worker thread, like a crashed browser binding.
pub struct PanickingFetcher;

impl PageFetcher for PanickingFetcher {
    fn fetch(&self, _plan: &PagePlan) -> anyhow::Result<String> {
        panic!("browser session crashed")
    }
}

pub struct Harness {
    pub service: Arc<ScrapeService>,
    _dir: tempfile::TempDir,
}

/// Full service wired to a temp sled store and the given fetcher.
pub fn harness(fetcher: Arc<dyn PageFetcher>) -> Harness {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(SledBatchStore::open(dir.path()).expect("open store"));
    let events = EventBroadcaster::new(16);
    let registry = SourceRegistry::standard().expect("standard registry");
    let service = Arc::new(ScrapeService::new(registry, fetcher, store, events));
    Harness {
        service,
        _dir: dir,
    }
}

fn gecko_row(i: usize) -> String {
    format!(
        concat!(
            "<tr>",
            "<td><div class=\"tw-block\">C{i}</div>",
            "<div class=\"tw-text-gray-700 tw-font-semibold tw-text-sm tw-leading-5\">",
            "Coin {i}<span>Buy</span></div></td>",
            "<td>{i}</td><td></td><td></td>",
            "<td>$1,234.5{i}</td>",
            "<td>0.1%</td>",
            "<td><span class=\"gecko-up\">1.{i}%</span></td>",
            "<td>2%</td><td>5%</td>",
            "<td>$28,000,000</td>",
            "<td>$1,260,000,000</td>",
            "</tr>"
        ),
        i = i,
    )
}

fn cmc_row(i: usize) -> String {
    format!(
        concat!(
            "<tr>",
            "<td>{i}</td><td>fav</td>",
            "<td><p class=\"coin-item-name\">Market {i}</p>",
            "<p class=\"coin-item-symbol\">M{i}</p></td>",
            "<td>1.234,5{i}</td>",
            "<td>0,1%</td>",
            "<td><span class=\"icon-Caret-up\"></span>1.{i}%</td>",
            "<td>3%</td>",
            "<td>$1,260,000,000</td>",
            "<td><p class=\"font_weight_500\">$28,000,000</p></td>",
            "</tr>"
        ),
        i = i,
    )
}

/// A page whose CoinGecko table holds `valid` well-formed rows with
/// `malformed` broken ones spread between them.
pub fn gecko_page(valid: usize, malformed: usize) -> String {
    let mut rows = String::new();
    for i in 0..malformed {
        rows.push_str("<tr><td>broken</td></tr>");
        // Spread the broken rows out instead of clustering them up front.
        if i < valid {
            rows.push_str(&gecko_row(i));
        }
    }
    for i in malformed.min(valid)..valid {
        rows.push_str(&gecko_row(i));
    }
    format!(
        "<html><body><table class=\"gecko-homepage-coin-table\"><tbody>{rows}</tbody></table></body></html>"
    )
}

/// A page carrying both the CoinGecko and the Coinmarketcap tables, so
/// two different extractors each find their own rows.
pub fn combined_page(rows_per_table: usize) -> String {
    let gecko: String = (0..rows_per_table).map(gecko_row).collect();
    let cmc: String = (0..rows_per_table).map(cmc_row).collect();
    format!(
        concat!(
            "<html><body>",
            "<table class=\"gecko-homepage-coin-table\"><tbody>{gecko}</tbody></table>",
            "<table class=\"cmc-table\"><tbody>{cmc}</tbody></table>",
            "</body></html>"
        ),
        gecko = gecko,
        cmc = cmc,
    )
}
