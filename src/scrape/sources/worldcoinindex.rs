//! WorldCoinIndex main table extractor

use super::inner_text;
use crate::scrape::clean::{clean_change, clean_numeric, DecimalStyle};
use crate::scrape::{Extractor, PagePlan};
use crate::types::{Record, MAX_ROWS};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::warn;

const URL: &str = "https://www.worldcoinindex.com";
const TABLE_SELECTOR: &str = "#myTable";
const ROW_SELECTOR: &str = "tbody tr";
const MIN_CELLS: usize = 12;

/// Extractor for worldcoinindex.com. Change cells carry an explicit
/// leading sign in the text, so no icon class lookup is needed.
pub struct WorldCoinIndex;

impl Extractor for WorldCoinIndex {
    fn name(&self) -> &'static str {
        "WorldCoinIndex"
    }

    fn plan(&self) -> PagePlan {
        PagePlan {
            url: URL,
            settle: Duration::from_secs(5),
            scroll_to_bottom: false,
        }
    }

    fn parse(&self, html: &str) -> Vec<Record> {
        let document = Html::parse_document(html);
        let (Ok(table_selector), Ok(row_selector)) =
            (Selector::parse(TABLE_SELECTOR), Selector::parse(ROW_SELECTOR))
        else {
            return Vec::new();
        };
        // Only the first #myTable; the page repeats the id further down.
        let Some(table) = document.select(&table_selector).next() else {
            return Vec::new();
        };

        let mut records = Vec::new();
        for (idx, row) in table.select(&row_selector).enumerate() {
            if records.len() == MAX_ROWS {
                break;
            }
            match parse_row(row, records.len() as u32 + 1) {
                Some(record) => records.push(record),
                None => warn!(source = "WorldCoinIndex", row = idx + 1, "skipping malformed row"),
            }
        }
        records
    }
}

fn parse_row(row: ElementRef<'_>, rank: u32) -> Option<Record> {
    let cell_selector = Selector::parse("td").ok()?;
    let cells: Vec<ElementRef<'_>> = row.select(&cell_selector).collect();
    if cells.len() < MIN_CELLS {
        return None;
    }

    let name = inner_text(cells[2]);
    let symbol = inner_text(cells[3]);
    let price = clean_numeric(&inner_text(cells[4]), DecimalStyle::Dot);
    let change24h = clean_change(&inner_text(cells[5]), None, DecimalStyle::Dot);
    let volume24h = clean_numeric(&inner_text(cells[9]), DecimalStyle::Dot);
    let market_cap = clean_numeric(&inner_text(cells[11]), DecimalStyle::Dot);

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
