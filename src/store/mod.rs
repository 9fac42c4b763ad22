//! Batch document persistence
//!
//! Append-only store of scrape batches in an embedded sled database.
//! There are no update or delete operations; batches are history.

use crate::types::{NewBatch, StoredBatch};
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Persistence gateway for batch documents.
#[async_trait]
pub trait BatchStore: Send + Sync {
    /// Persist one batch document, returning its generated id.
    async fn save(&self, batch: &NewBatch) -> Result<String, StoreError>;

    /// All batches in storage order, optionally filtered to one source.
    async fn list(&self, source: Option<&str>) -> Result<Vec<StoredBatch>, StoreError>;
}

/// sled-backed store.
///
/// Documents are JSON values under a monotonic big-endian key, so
/// iteration returns insertion order. The public id is a UUID inside the
/// document; the internal key never leaves this module.
pub struct SledBatchStore {
    db: sled::Db,
    tree: sled::Tree,
}

impl SledBatchStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        let tree = db.open_tree("batches")?;
        Ok(Self { db, tree })
    }
}

#[async_trait]
impl BatchStore for SledBatchStore {
    async fn save(&self, batch: &NewBatch) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let document = StoredBatch {
            id: id.clone(),
            source: batch.source.clone(),
            timestamp: batch.timestamp,
            data: batch.data.clone(),
        };

        let key = self.db.generate_id()?.to_be_bytes();
        self.tree.insert(key, serde_json::to_vec(&document)?)?;
        self.tree.flush_async().await?;

        info!(
            source = %batch.source,
            records = batch.data.len(),
            id = %id,
            "batch persisted"
        );
        Ok(id)
    }

    async fn list(&self, source: Option<&str>) -> Result<Vec<StoredBatch>, StoreError> {
        let mut batches = Vec::new();
        for entry in self.tree.iter() {
            let (_key, value) = entry?;
            let document: StoredBatch = serde_json::from_slice(&value)?;
            if source.map_or(true, |s| document.source == s) {
                batches.push(document);
            }
        }
        Ok(batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Record;
    use chrono::Utc;

    fn record(row: u32, symbol: &str) -> Record {
        Record {
            row,
            symbol: symbol.to_string(),
            name: format!("{symbol} Coin"),
            price: "100.5".into(),
            change24h: "+1.2".into(),
            volume24h: "900000".into(),
            market_cap: "12000000".into(),
        }
    }

    fn batch(source: &str, rows: &[&str]) -> NewBatch {
        NewBatch {
            source: source.to_string(),
            timestamp: Utc::now(),
            data: rows
                .iter()
                .enumerate()
                .map(|(i, s)| record(i as u32 + 1, s))
                .collect(),
        }
    }

    fn open_temp() -> (tempfile::TempDir, SledBatchStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SledBatchStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn save_and_list_round_trips_every_field() {
        let (_dir, store) = open_temp();
        let new_batch = batch("CoinGecko", &["BTC", "ETH"]);
        let id = store.save(&new_batch).await.unwrap();

        let listed = store.list(None).await.unwrap();
        assert_eq!(listed.len(), 1);
        let stored = &listed[0];
        assert_eq!(stored.id, id);
        assert_eq!(stored.source, new_batch.source);
        assert_eq!(stored.timestamp, new_batch.timestamp);
        assert_eq!(stored.data, new_batch.data);
    }

    #[tokio::test]
    async fn list_filters_by_source() {
        let (_dir, store) = open_temp();
        store.save(&batch("CoinGecko", &["BTC"])).await.unwrap();
        store.save(&batch("Coinmarketcap", &["ETH"])).await.unwrap();

        let all = store.list(None).await.unwrap();
        assert_eq!(all.len(), 2);
        // Storage order is insertion order.
        assert_eq!(all[0].source, "CoinGecko");
        assert_eq!(all[1].source, "Coinmarketcap");

        let gecko = store.list(Some("CoinGecko")).await.unwrap();
        assert_eq!(gecko.len(), 1);
        assert_eq!(gecko[0].source, "CoinGecko");

        assert!(store.list(Some("Nowhere")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_idempotent_without_writes() {
        let (_dir, store) = open_temp();
        store.save(&batch("CoinGecko", &["BTC"])).await.unwrap();

        let first = store.list(Some("CoinGecko")).await.unwrap();
        let second = store.list(Some("CoinGecko")).await.unwrap();
        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].id, second[0].id);
        assert_eq!(first[0].data, second[0].data);
    }

    #[tokio::test]
    async fn ids_are_unique_per_batch() {
        let (_dir, store) = open_temp();
        let a = store.save(&batch("CoinGecko", &["BTC"])).await.unwrap();
        let b = store.save(&batch("CoinGecko", &["BTC"])).await.unwrap();
        assert_ne!(a, b);
    }
}
