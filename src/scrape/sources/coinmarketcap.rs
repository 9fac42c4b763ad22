//! Coinmarketcap (Spanish locale) main table extractor

use super::{select_class, select_text};
use crate::scrape::clean::{clean_change, clean_numeric, DecimalStyle};
use crate::scrape::{Extractor, PagePlan};
use crate::types::{Record, MAX_ROWS};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::warn;

const URL: &str = "https://coinmarketcap.com/es/";
const ROW_SELECTOR: &str = "table.cmc-table tbody tr";
const SYMBOL_SELECTOR: &str = ".coin-item-symbol";
const NAME_SELECTOR: &str = ".coin-item-name";
const PRICE_SELECTOR: &str = "td:nth-child(4)";
const CHANGE_SELECTOR: &str = "td:nth-child(6)";
const MARKET_CAP_SELECTOR: &str = "td:nth-child(8)";
const VOLUME_SELECTOR: &str = ".font_weight_500";
const CARET_SELECTOR: &str = "span[class*='icon-Caret']";

/// Extractor for coinmarketcap.com/es. Rows below the fold are lazy, so
/// the plan scrolls to the bottom before settling. The Spanish locale
/// prints prices with comma decimals.
pub struct Coinmarketcap;

impl Extractor for Coinmarketcap {
    fn name(&self) -> &'static str {
        "Coinmarketcap"
    }

    fn plan(&self) -> PagePlan {
        PagePlan {
            url: URL,
            settle: Duration::from_secs(3),
            scroll_to_bottom: true,
        }
    }

    fn parse(&self, html: &str) -> Vec<Record> {
        let document = Html::parse_document(html);
        let Ok(row_selector) = Selector::parse(ROW_SELECTOR) else {
            return Vec::new();
        };

        let mut records = Vec::new();
        for (idx, row) in document.select(&row_selector).enumerate() {
            if records.len() == MAX_ROWS {
                break;
            }
            match parse_row(row, records.len() as u32 + 1) {
                Some(record) => records.push(record),
                None => warn!(source = "Coinmarketcap", row = idx + 1, "skipping malformed row"),
            }
        }
        records
    }
}

fn parse_row(row: ElementRef<'_>, rank: u32) -> Option<Record> {
    let symbol_selector = Selector::parse(SYMBOL_SELECTOR).ok()?;
    let name_selector = Selector::parse(NAME_SELECTOR).ok()?;
    let price_selector = Selector::parse(PRICE_SELECTOR).ok()?;
    let change_selector = Selector::parse(CHANGE_SELECTOR).ok()?;
    let market_cap_selector = Selector::parse(MARKET_CAP_SELECTOR).ok()?;
    let volume_selector = Selector::parse(VOLUME_SELECTOR).ok()?;
    let caret_selector = Selector::parse(CARET_SELECTOR).ok()?;

    let symbol = select_text(row, &symbol_selector)?;
    let name = select_text(row, &name_selector)?;

    let price = clean_numeric(&select_text(row, &price_selector)?, DecimalStyle::Comma);

    let change_cell = row.select(&change_selector).next()?;
    let change24h = clean_change(
        &super::inner_text(change_cell),
        select_class(change_cell, &caret_selector).as_deref(),
        DecimalStyle::Dot,
    );

    let market_cap = clean_numeric(&select_text(row, &market_cap_selector)?, DecimalStyle::Dot);
    let volume24h = clean_numeric(&select_text(row, &volume_selector)?, DecimalStyle::Dot);

    if symbol.is_empty() || name.is_empty() || price.is_empty() {
        return None;
    }

    Some(Record {
        row: rank,
        symbol,
        name,
        price,
        change24h,
        volume24h,
        market_cap,
    })
}
