//! Environment-driven configuration
//!
//! Every loader takes a lookup function so tests can feed a map instead of
//! mutating the process environment.

use std::str::FromStr;

use super::builder::ScrapeConfigBuilder;
use super::types::StoreConfig;
use crate::error::ConfigError;

pub const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
pub const SUPABASE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";

const MAX_RETRIES_VAR: &str = "REPORTSCRAPE_MAX_RETRIES";
const HEADLESS_VAR: &str = "REPORTSCRAPE_HEADLESS";
const NAVIGATION_TIMEOUT_VAR: &str = "REPORTSCRAPE_NAVIGATION_TIMEOUT_SECS";
const SELECTOR_WAIT_VAR: &str = "REPORTSCRAPE_SELECTOR_WAIT_SECS";
const ENTITY_DELAY_VAR: &str = "REPORTSCRAPE_ENTITY_DELAY_MS";
const FAIL_FAST_VAR: &str = "REPORTSCRAPE_FAIL_FAST";

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl StoreConfig {
    /// Load the hosted store settings from `SUPABASE_URL` and
    /// `SUPABASE_SERVICE_ROLE_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(&lookup, SUPABASE_URL_VAR)?;
        let key = required(&lookup, SUPABASE_KEY_VAR)?;
        StoreConfig::builder().url(url).service_role_key(key).build()
    }
}

impl ScrapeConfigBuilder {
    /// Apply `REPORTSCRAPE_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_lookup_overrides(process_env)
    }

    pub fn with_lookup_overrides<F>(self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = self;
        if let Some(v) = optional::<u32, _>(&lookup, MAX_RETRIES_VAR)? {
            builder = builder.max_retries(v);
        }
        if let Some(v) = optional_bool(&lookup, HEADLESS_VAR)? {
            builder = builder.headless(v);
        }
        if let Some(v) = optional::<u64, _>(&lookup, NAVIGATION_TIMEOUT_VAR)? {
            builder = builder.navigation_timeout_secs(v);
        }
        if let Some(v) = optional::<u64, _>(&lookup, SELECTOR_WAIT_VAR)? {
            builder = builder.selector_wait_timeout_secs(v);
        }
        if let Some(v) = optional::<u64, _>(&lookup, ENTITY_DELAY_VAR)? {
            builder = builder.entity_delay_ms(v);
        }
        if let Some(v) = optional_bool(&lookup, FAIL_FAST_VAR)? {
            builder = builder.fail_fast(v);
        }
        Ok(builder)
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

fn optional<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidVar {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        })
}

fn optional_bool<F>(lookup: &F, name: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidVar {
            name,
            value: raw,
            reason: "expected a boolean".to_string(),
        }),
    }
}
