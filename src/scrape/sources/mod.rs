//! Per-source extractors (CoinGecko, Coinmarketcap, WorldCoinIndex)

mod coingecko;
mod coinmarketcap;
mod worldcoinindex;

pub use coingecko::CoinGecko;
pub use coinmarketcap::Coinmarketcap;
pub use worldcoinindex::WorldCoinIndex;

use scraper::{ElementRef, Selector};

/// Concatenated text content of an element, trimmed.
pub(crate) fn inner_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first element matching `selector` within `scope`.
pub(crate) fn select_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(inner_text)
}

/// Class attribute of the first matching descendant, used for sign
/// recovery on change cells.
pub(crate) fn select_class(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .find_map(|el| el.value().attr("class").map(str::to_string))
}
