//! Configuration module for batch runs
//!
//! `ScrapeConfig` and its builder tune rendering and pacing; `StoreConfig`
//! carries the hosted store endpoint and is normally loaded from the
//! environment.

// Sub-modules
pub mod builder;
pub mod env;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{Complete, ScrapeConfigBuilder, StoreConfigBuilder, WithUrl};
pub use env::{SUPABASE_KEY_VAR, SUPABASE_URL_VAR};
pub use types::{ScrapeConfig, StoreConfig};
