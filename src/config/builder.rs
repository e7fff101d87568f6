//! Builders for `ScrapeConfig` and `StoreConfig`
//!
//! `StoreConfigBuilder` uses the typestate pattern so that a store config
//! cannot be built without both the endpoint and the credential.

use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::{ScrapeConfig, StoreConfig};
use crate::error::ConfigError;
use crate::utils::{
    DEFAULT_ENTITY_DELAY_MS, DEFAULT_MAX_RETRIES, DEFAULT_NAVIGATION_TIMEOUT_SECS,
    DEFAULT_RETRY_BACKOFF_MS, DEFAULT_SELECTOR_WAIT_TIMEOUT_SECS,
};

pub const DEFAULT_ENTITY_TABLE: &str = "Stock";
pub const DEFAULT_RECORD_TABLE: &str = "stockdetail";

#[derive(Debug, Clone)]
pub struct ScrapeConfigBuilder {
    headless: bool,
    navigation_timeout_secs: u64,
    selector_wait_timeout_secs: u64,
    max_retries: u32,
    retry_backoff_ms: u64,
    entity_delay_ms: u64,
    fail_fast: bool,
    chrome_data_dir: Option<PathBuf>,
}

impl Default for ScrapeConfigBuilder {
    fn default() -> Self {
        Self {
            headless: true,
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
            selector_wait_timeout_secs: DEFAULT_SELECTOR_WAIT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            entity_delay_ms: DEFAULT_ENTITY_DELAY_MS,
            fail_fast: false,
            chrome_data_dir: None,
        }
    }
}

impl ScrapeConfig {
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder::default()
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        let b = ScrapeConfigBuilder::default();
        Self {
            headless: b.headless,
            navigation_timeout_secs: b.navigation_timeout_secs,
            selector_wait_timeout_secs: b.selector_wait_timeout_secs,
            max_retries: b.max_retries,
            retry_backoff_ms: b.retry_backoff_ms,
            entity_delay_ms: b.entity_delay_ms,
            fail_fast: b.fail_fast,
            chrome_data_dir: b.chrome_data_dir,
        }
    }
}

impl ScrapeConfigBuilder {
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn navigation_timeout_secs(mut self, secs: u64) -> Self {
        self.navigation_timeout_secs = secs;
        self
    }

    /// A zero wait skips the selector wait entirely.
    pub fn selector_wait_timeout_secs(mut self, secs: u64) -> Self {
        self.selector_wait_timeout_secs = secs;
        self
    }

    /// Render attempts per entity. Values below 1 are raised to 1.
    pub fn max_retries(mut self, attempts: u32) -> Self {
        self.max_retries = attempts.max(1);
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.retry_backoff_ms = ms;
        self
    }

    pub fn entity_delay_ms(mut self, ms: u64) -> Self {
        self.entity_delay_ms = ms;
        self
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn chrome_data_dir(mut self, dir: Option<impl Into<PathBuf>>) -> Self {
        self.chrome_data_dir = dir.map(Into::into);
        self
    }

    pub fn build(self) -> Result<ScrapeConfig, ConfigError> {
        if self.navigation_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "navigation timeout must be at least 1 second".to_string(),
            ));
        }

        Ok(ScrapeConfig {
            headless: self.headless,
            navigation_timeout_secs: self.navigation_timeout_secs,
            selector_wait_timeout_secs: self.selector_wait_timeout_secs,
            max_retries: self.max_retries,
            retry_backoff_ms: self.retry_backoff_ms,
            entity_delay_ms: self.entity_delay_ms,
            fail_fast: self.fail_fast,
            chrome_data_dir: self.chrome_data_dir,
        })
    }
}

// Type states for the store builder
pub struct WithUrl;
pub struct Complete;

pub struct StoreConfigBuilder<State = ()> {
    url: Option<String>,
    service_role_key: Option<String>,
    entity_table: String,
    record_table: String,
    _phantom: PhantomData<State>,
}

impl StoreConfig {
    #[must_use]
    pub fn builder() -> StoreConfigBuilder<()> {
        StoreConfigBuilder {
            url: None,
            service_role_key: None,
            entity_table: DEFAULT_ENTITY_TABLE.to_string(),
            record_table: DEFAULT_RECORD_TABLE.to_string(),
            _phantom: PhantomData,
        }
    }
}

impl StoreConfigBuilder<()> {
    pub fn url(self, url: impl Into<String>) -> StoreConfigBuilder<WithUrl> {
        StoreConfigBuilder {
            url: Some(url.into()),
            service_role_key: self.service_role_key,
            entity_table: self.entity_table,
            record_table: self.record_table,
            _phantom: PhantomData,
        }
    }
}

impl StoreConfigBuilder<WithUrl> {
    pub fn service_role_key(self, key: impl Into<String>) -> StoreConfigBuilder<Complete> {
        StoreConfigBuilder {
            url: self.url,
            service_role_key: Some(key.into()),
            entity_table: self.entity_table,
            record_table: self.record_table,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when all required fields are set
impl StoreConfigBuilder<Complete> {
    pub fn build(self) -> Result<StoreConfig, ConfigError> {
        let url = self.url.unwrap_or_default();
        let parsed = url::Url::parse(&url).map_err(|e| ConfigError::InvalidVar {
            name: "SUPABASE_URL",
            value: url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidVar {
                name: "SUPABASE_URL",
                value: url,
                reason: "expected an http(s) URL".to_string(),
            });
        }

        Ok(StoreConfig {
            url,
            service_role_key: self.service_role_key.unwrap_or_default(),
            entity_table: self.entity_table,
            record_table: self.record_table,
        })
    }
}

impl<State> StoreConfigBuilder<State> {
    /// Table listing the entities to scrape (default `Stock`)
    pub fn entity_table(mut self, table: impl Into<String>) -> Self {
        self.entity_table = table.into();
        self
    }

    /// Table receiving one record per entity (default `stockdetail`)
    pub fn record_table(mut self, table: impl Into<String>) -> Self {
        self.record_table = table.into();
        self
    }
}
