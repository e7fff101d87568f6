//! Accessor methods for `ScrapeConfig` and `StoreConfig`

use std::path::PathBuf;
use std::time::Duration;

use super::types::{ScrapeConfig, StoreConfig};

impl ScrapeConfig {
    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn navigation_timeout_secs(&self) -> u64 {
        self.navigation_timeout_secs
    }

    #[must_use]
    pub fn selector_wait_timeout_secs(&self) -> u64 {
        self.selector_wait_timeout_secs
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[must_use]
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    #[must_use]
    pub fn entity_delay(&self) -> Duration {
        Duration::from_millis(self.entity_delay_ms)
    }

    #[must_use]
    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }
}

impl StoreConfig {
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn service_role_key(&self) -> &str {
        &self.service_role_key
    }

    #[must_use]
    pub fn entity_table(&self) -> &str {
        &self.entity_table
    }

    #[must_use]
    pub fn record_table(&self) -> &str {
        &self.record_table
    }
}
