//! Configuration management for coinscrape
//!
//! Loads from optional YAML files + environment variables via .env

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub scrape: ScrapeConfig,
    pub persistence: PersistenceConfig,
    pub events: EventsConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP API
    pub host: String,
    /// Bind port for the HTTP API
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// Timeout for individual page operations in seconds
    pub page_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
    /// Directory holding the embedded batch database
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    /// Broadcast channel capacity; subscribers falling further behind lag
    pub capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Trigger every source periodically from inside the process
    pub enabled: bool,
    /// Interval between scheduled sweeps in seconds
    pub interval_secs: u64,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Server defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            // Scrape defaults
            .set_default("scrape.page_timeout_secs", 60)?
            // Persistence defaults
            .set_default("persistence.data_dir", "./data")?
            // Events defaults
            .set_default("events.capacity", 64)?
            // Scheduler defaults
            .set_default("scheduler.enabled", false)?
            .set_default("scheduler.interval_secs", 900)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (COINSCRAPE_*)
            .add_source(Environment::with_prefix("COINSCRAPE").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(app_config)
    }

    /// Generate a digest of the config for logging
    pub fn digest(&self) -> String {
        format!(
            "bind={}:{} data_dir={} page_timeout={}s scheduler={}",
            self.server.host,
            self.server.port,
            self.persistence.data_dir,
            self.scrape.page_timeout_secs,
            if self.scheduler.enabled {
                format!("every {}s", self.scheduler.interval_secs)
            } else {
                "off".to_string()
            }
        )
    }
}
