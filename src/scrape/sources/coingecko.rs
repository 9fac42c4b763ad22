//! CoinGecko homepage coin table extractor

use super::{inner_text, select_class, select_text};
use crate::scrape::clean::{clean_change, clean_numeric, DecimalStyle};
use crate::scrape::{Extractor, PagePlan};
use crate::types::{Record, MAX_ROWS};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::warn;

const URL: &str = "https://www.coingecko.com/";
const ROW_SELECTOR: &str = ".gecko-homepage-coin-table tbody tr";
const SYMBOL_SELECTOR: &str = "div.tw-block";
const NAME_SELECTOR: &str = "div.tw-text-gray-700.tw-font-semibold.tw-text-sm.tw-leading-5";
const MIN_CELLS: usize = 11;

/// Extractor for the CoinGecko homepage. The table renders client-side,
/// so the page needs a settle delay before the rows exist.
pub struct CoinGecko;

impl Extractor for CoinGecko {
    fn name(&self) -> &'static str {
        "CoinGecko"
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
                None => warn!(source = "CoinGecko", row = idx + 1, "skipping malformed row"),
            }
        }
        records
    }
}

fn parse_row(row: ElementRef<'_>, rank: u32) -> Option<Record> {
    let cell_selector = Selector::parse("td").ok()?;
    let span_selector = Selector::parse("span").ok()?;
    let symbol_selector = Selector::parse(SYMBOL_SELECTOR).ok()?;
    let name_selector = Selector::parse(NAME_SELECTOR).ok()?;

    let cells: Vec<ElementRef<'_>> = row.select(&cell_selector).collect();
    if cells.len() < MIN_CELLS {
        return None;
    }

    let symbol = select_text(row, &symbol_selector)?;
    // The name container nests badge markup after the coin name; only the
    // first text node is the name itself.
    let name = row
        .select(&name_selector)
        .next()?
        .text()
        .next()?
        .trim()
        .to_string();

    let price = clean_numeric(&inner_text(cells[4]), DecimalStyle::Dot);
    let change24h = clean_change(
        &inner_text(cells[6]),
        select_class(cells[6], &span_selector).as_deref(),
        DecimalStyle::Dot,
    );
    let volume24h = clean_numeric(&inner_text(cells[9]), DecimalStyle::Dot);
    let market_cap = clean_numeric(&inner_text(cells[10]), DecimalStyle::Dot);

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

#[cfg(test)]
mod tests {
    use super::*;

    fn coin_row(symbol: &str, name: &str, price: &str, change: &str, icon: &str) -> String {
        format!(
            concat!(
                "<tr>",
                "<td><div class=\"tw-block\">{symbol}</div>",
                "<div class=\"tw-text-gray-700 tw-font-semibold tw-text-sm tw-leading-5\">",
                "{name}<span>Buy</span></div></td>",
                "<td>1</td><td></td><td></td>",
                "<td>{price}</td>",
                "<td>0.1%</td>",
                "<td><span class=\"{icon}\">{change}</span></td>",
                "<td>2%</td><td>5%</td>",
                "<td>$28,000,000,000</td>",
                "<td>$1,260,000,000,000</td>",
                "</tr>"
            ),
            symbol = symbol,
            name = name,
            price = price,
            change = change,
            icon = icon,
        )
    }

    fn page(rows: &str) -> String {
        format!(
            "<html><body><table class=\"gecko-homepage-coin-table\"><tbody>{rows}</tbody></table></body></html>"
        )
    }

    #[test]
    fn parses_a_well_formed_row() {
        let html = page(&coin_row("BTC", "Bitcoin", "$64,123.50", "1.2%", "gecko-up"));
        let records = CoinGecko.parse(&html);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.row, 1);
        assert_eq!(record.symbol, "BTC");
        assert_eq!(record.name, "Bitcoin");
        assert_eq!(record.price, "64123.50");
        assert_eq!(record.change24h, "+1.2");
        assert_eq!(record.volume24h, "28000000000");
        assert_eq!(record.market_cap, "1260000000000");
    }

    #[test]
    fn sign_recovered_from_down_class() {
        let html = page(&coin_row("ETH", "Ethereum", "$3,200.10", "0.8%", "gecko-down"));
        let records = CoinGecko.parse(&html);
        assert_eq!(records[0].change24h, "-0.8");
    }

    #[test]
    fn malformed_rows_are_skipped_and_ranks_stay_contiguous() {
        let mut rows = String::new();
        rows.push_str(&coin_row("BTC", "Bitcoin", "$1.00", "+1%", ""));
        // Missing cells entirely.
        rows.push_str("<tr><td>junk</td></tr>");
        rows.push_str(&coin_row("ETH", "Ethereum", "$2.00", "-2%", ""));

        let records = CoinGecko.parse(&page(&rows));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].row, 1);
        assert_eq!(records[1].row, 2);
        assert_eq!(records[1].symbol, "ETH");
    }

    #[test]
    fn cap_applies_to_valid_rows_not_candidates() {
        // 20 candidates, 3 malformed: 17 valid, capped at 15.
        let mut rows = String::new();
        for i in 0..20 {
            if i % 7 == 3 {
                rows.push_str("<tr><td>broken</td></tr>");
            } else {
                rows.push_str(&coin_row(
                    &format!("C{i}"),
                    &format!("Coin {i}"),
                    "$1.00",
                    "+1%",
                    "",
                ));
            }
        }

        let records = CoinGecko.parse(&page(&rows));
        assert_eq!(records.len(), MAX_ROWS);
        let ranks: Vec<u32> = records.iter().map(|r| r.row).collect();
        assert_eq!(ranks, (1..=15).collect::<Vec<u32>>());
    }

    #[test]
    fn unmatched_page_yields_empty() {
        assert!(CoinGecko.parse("<html><body><p>maintenance</p></body></html>").is_empty());
    }
}
