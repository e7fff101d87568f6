//! Core configuration types
//!
//! `ScrapeConfig` tunes rendering, retry and batch pacing. `StoreConfig`
//! holds the hosted store endpoint and credential.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Rendering, retry and pacing configuration for a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub(crate) headless: bool,

    /// Budget in seconds for `page.goto()` and the network-quiescence wait
    ///
    /// Default: 60 seconds
    pub(crate) navigation_timeout_secs: u64,

    /// Best-effort wait in seconds for a PDF-shaped anchor to appear
    ///
    /// Expiry is not an error; extraction proceeds with whatever is in the DOM.
    ///
    /// Default: 15 seconds
    pub(crate) selector_wait_timeout_secs: u64,

    /// Render attempts per entity, always at least 1
    pub(crate) max_retries: u32,

    /// Linear backoff unit; attempt `n` is followed by `n * retry_backoff_ms`
    pub(crate) retry_backoff_ms: u64,

    /// Delay between consecutive entities
    pub(crate) entity_delay_ms: u64,

    /// Abort the batch on the first upsert failure instead of logging it
    pub(crate) fail_fast: bool,

    /// Parent directory for per-render Chrome profiles (system temp dir if unset)
    pub(crate) chrome_data_dir: Option<PathBuf>,
}

/// Connection settings for the hosted (PostgREST) store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub(crate) url: String,
    #[serde(skip_serializing)]
    pub(crate) service_role_key: String,
    pub(crate) entity_table: String,
    pub(crate) record_table: String,
}
