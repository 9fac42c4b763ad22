//! Periodic trigger loop
//!
//! Fires one run per registered source on a fixed interval, exactly like
//! an external cron hitting the run endpoint. Has no coordination with
//! in-flight runs.

use crate::service::ScrapeService;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

/// Spawn the scheduler task. The handle is detached by the caller; the
/// loop runs for the lifetime of the process.
pub fn spawn(service: Arc<ScrapeService>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval fires immediately; skip that tick so startup does not
        // trigger a full sweep.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            for source in service.sources() {
                info!(source = %source, "scheduled run");
                let outcome = service.run(&source).await;
                if !outcome.is_success() {
                    warn!(
                        source = %source,
                        message = %outcome.message,
                        "scheduled run did not succeed"
                    );
                }
            }
        }
    })
}
