//! Run event broadcaster
//!
//! Fans run outcomes out to whoever is subscribed right now. Delivery is
//! at-most-once with no replay: an absent consumer misses events, a slow
//! one past the channel capacity lags.

use crate::types::ScrapeEvent;
use tokio::sync::broadcast;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<String>,
}

impl EventBroadcaster {
    /// Create a new broadcaster with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to events published from now on. Dropping the receiver
    /// releases the subscription.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Publish an event to current subscribers, serialized as JSON.
    pub fn publish(&self, event: &ScrapeEvent) {
        if let Ok(json) = serde_json::to_string(event) {
            // Ignore send errors (no receivers is fine)
            let _ = self.tx.send(json);
        }
        debug!(status = %event.status, source = %event.source, "event published");
    }
}
