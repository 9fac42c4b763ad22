//! coinscrape Library
//!
//! Scrapes crypto market tables with a headless browser, persists each
//! snapshot as an immutable batch document, and streams run events to
//! subscribers.

pub mod api;
pub mod config;
pub mod events;
pub mod scheduler;
pub mod scrape;
pub mod service;
pub mod store;
pub mod types;
