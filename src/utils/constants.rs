//! Shared configuration constants for reportscrape
//!
//! Default values used by the config builder, the renderer and the batch
//! reconciler, kept in one place to avoid magic numbers.

/// Default navigation budget: 60 seconds
///
/// Covers `page.goto()` plus the network-quiescence wait that follows it.
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 60;

/// Default best-effort wait for the first PDF-shaped anchor: 15 seconds
///
/// Expiry is not an error.
pub const DEFAULT_SELECTOR_WAIT_TIMEOUT_SECS: u64 = 15;

/// Default render attempts per entity (no retry)
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Linear backoff unit between render attempts
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 1000;

/// Politeness delay between entities
pub const DEFAULT_ENTITY_DELAY_MS: u64 = 800;

/// How long the resource count must stay unchanged to call the network quiet
pub const NETWORK_IDLE_QUIET_MS: u64 = 500;

/// Poll interval for in-page readiness checks
pub const PAGE_POLL_INTERVAL_MS: u64 = 250;

/// Viewport used for every render
pub const VIEWPORT_WIDTH: u32 = 1280;
pub const VIEWPORT_HEIGHT: u32 = 800;

/// Desktop Chrome on Linux
pub const CHROME_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Safari/537.36";

/// Accept-Language sent with every request
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// CSS selector matching anchors that look like PDF links
pub const PDF_ANCHOR_SELECTOR: &str = r#"a[href$=".pdf" i], a[href*=".pdf?" i]"#;

/// Title used for PDF links whose anchor has no visible text
pub const UNTITLED_PDF: &str = "Untitled PDF";
