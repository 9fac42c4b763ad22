//! Core types used throughout coinscrape
//!
//! Defines the record/batch shapes, the run-outcome envelope, and the
//! event payload shared by the service, store, and API layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of records kept per batch.
pub const MAX_ROWS: usize = 15;

/// One row of market data within a batch.
///
/// Numeric-looking fields stay as cleaned strings (digits, optional sign,
/// single decimal separator); numeric parsing is deferred to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// 1-based rank within the batch.
    pub row: u32,
    pub symbol: String,
    pub name: String,
    pub price: String,
    pub change24h: String,
    pub volume24h: String,
    pub market_cap: String,
}

/// A batch about to be persisted: one source, one capture instant,
/// up to [`MAX_ROWS`] records in extraction order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBatch {
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub data: Vec<Record>,
}

/// A persisted batch as read back from the store. `id` is the generated
/// document id; the store's internal key is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredBatch {
    pub id: String,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub data: Vec<Record>,
}

// ─────────────────────────────────────────────────────────────────
// Outcome envelope
// ─────────────────────────────────────────────────────────────────

/// Result discriminator used across the pipeline.
///
/// `Warning` means "ran cleanly but produced nothing", distinct from
/// `Error` ("something failed").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Success,
    Warning,
    Error,
}

/// Uniform response envelope: kind + human-readable message + optional
/// payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome<T> {
    pub kind: OutcomeKind,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Outcome<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            kind: OutcomeKind::Success,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Warning,
            message: message.into(),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Error,
            message: message.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }
}

/// Payload of a successful run outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Generated id of the persisted batch.
    pub id: String,
    /// Number of records in the batch.
    pub records: usize,
}

// ─────────────────────────────────────────────────────────────────
// Run events
// ─────────────────────────────────────────────────────────────────

/// Status tag carried by a run event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Success,
    Failure,
    Error,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStatus::Success => write!(f, "SUCCESS"),
            EventStatus::Failure => write!(f, "FAILURE"),
            EventStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Ephemeral notification published once per run. Lost if nobody is
/// subscribed at publish time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeEvent {
    pub status: EventStatus,
    pub source: String,
    pub message: String,
}

impl ScrapeEvent {
    pub fn new(status: EventStatus, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            source: source.into(),
            message: message.into(),
        }
    }
}
