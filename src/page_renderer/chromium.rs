//! Chromium-backed page renderer
//!
//! One browser per `render()` call:
//! 1. Launch an isolated browser session
//! 2. Apply user agent, Accept-Language and viewport
//! 3. Navigate, bounded by the navigation timeout
//! 4. Wait (best effort) for the network to go quiet
//! 5. Wait (best effort) for a PDF-shaped anchor
//! 6. Read every anchor from the live DOM
//!
//! The session is closed on every exit path of steps 2-6.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use serde::Deserialize;
use tracing::{debug, warn};

use super::PageRenderer;
use super::js_scripts::{ANCHORS_SCRIPT, NETWORK_STATE_SCRIPT, pdf_anchor_probe_script};
use super::page_timeout::with_page_timeout;
use crate::browser_setup::BrowserSession;
use crate::config::ScrapeConfig;
use crate::error::RenderError;
use crate::store::RawAnchor;
use crate::utils::{
    ACCEPT_LANGUAGE, CHROME_USER_AGENT, NETWORK_IDLE_QUIET_MS, PAGE_POLL_INTERVAL_MS,
    VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};

#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    config: ScrapeConfig,
}

impl ChromiumRenderer {
    #[must_use]
    pub fn new(config: ScrapeConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn render(&self, url: &str) -> Result<Vec<RawAnchor>, RenderError> {
        let session = BrowserSession::launch(&self.config).await?;
        let result = render_in_browser(session.browser(), url, &self.config).await;
        session.close().await;
        result
    }
}

async fn render_in_browser(
    browser: &Browser,
    url: &str,
    config: &ScrapeConfig,
) -> Result<Vec<RawAnchor>, RenderError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| RenderError::Launch(format!("Failed to open page: {e}")))?;

    if let Err(e) = prepare_page(&page).await {
        warn!(target: "reportscrape::render", "Failed to apply page settings for {url}: {e}");
    }

    let nav_secs = config.navigation_timeout_secs();
    let started = Instant::now();
    with_page_timeout(
        async {
            page.goto(url)
                .await
                .map(|_| ())
                .map_err(|e| RenderError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })
        },
        nav_secs,
        "Navigation",
    )
    .await?;

    let remaining = Duration::from_secs(nav_secs).saturating_sub(started.elapsed());
    wait_for_network_idle(&page, remaining).await;

    let selector_wait = Duration::from_secs(config.selector_wait_timeout_secs());
    if !selector_wait.is_zero() {
        wait_for_pdf_anchor(&page, selector_wait).await;
    }

    let anchors = extract_anchors(&page).await?;
    debug!(target: "reportscrape::render", "Read {} anchors from {url}", anchors.len());

    if let Err(e) = page.close().await {
        debug!(target: "reportscrape::render", "Failed to close page for {url}: {e}");
    }

    Ok(anchors)
}

/// User agent, Accept-Language and a fixed desktop viewport.
async fn prepare_page(page: &Page) -> anyhow::Result<()> {
    page.execute(SetUserAgentOverrideParams {
        user_agent: CHROME_USER_AGENT.to_string(),
        accept_language: Some(ACCEPT_LANGUAGE.to_string()),
        platform: None,
        user_agent_metadata: None,
    })
    .await?;

    page.execute(
        SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(VIEWPORT_WIDTH))
            .height(i64::from(VIEWPORT_HEIGHT))
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(anyhow::Error::msg)?,
    )
    .await?;

    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkState {
    ready_state: String,
    resources: u64,
}

/// Poll until the document is complete and no new resources have been
/// fetched for `NETWORK_IDLE_QUIET_MS`, or until `budget` runs out.
async fn wait_for_network_idle(page: &Page, budget: Duration) {
    let deadline = Instant::now() + budget;
    let quiet = Duration::from_millis(NETWORK_IDLE_QUIET_MS);
    let poll = Duration::from_millis(PAGE_POLL_INTERVAL_MS);

    let mut last_count: Option<u64> = None;
    let mut stable_since = Instant::now();

    while Instant::now() < deadline {
        match page.evaluate(NETWORK_STATE_SCRIPT).await {
            Ok(result) => match result.into_value::<NetworkState>() {
                Ok(state) => {
                    if last_count != Some(state.resources) {
                        last_count = Some(state.resources);
                        stable_since = Instant::now();
                    } else if state.ready_state == "complete" && stable_since.elapsed() >= quiet {
                        return;
                    }
                }
                Err(e) => debug!(target: "reportscrape::render", "Unexpected network state: {e}"),
            },
            Err(e) => debug!(target: "reportscrape::render", "Network state probe failed: {e}"),
        }
        tokio::time::sleep(poll).await;
    }

    debug!(target: "reportscrape::render", "Network did not go quiet within {budget:?}, continuing");
}

/// Poll for the first PDF-shaped anchor. Expiry is not an error.
async fn wait_for_pdf_anchor(page: &Page, budget: Duration) {
    let deadline = Instant::now() + budget;
    let probe = pdf_anchor_probe_script();
    let poll = Duration::from_millis(PAGE_POLL_INTERVAL_MS);

    loop {
        let found = match page.evaluate(probe.as_str()).await {
            Ok(result) => result.into_value::<bool>().unwrap_or(false),
            Err(e) => {
                debug!(target: "reportscrape::render", "PDF anchor probe failed: {e}");
                false
            }
        };
        if found {
            return;
        }
        if Instant::now() >= deadline {
            debug!(target: "reportscrape::render", "No PDF anchor after {budget:?}, extracting anyway");
            return;
        }
        tokio::time::sleep(poll).await;
    }
}

async fn extract_anchors(page: &Page) -> Result<Vec<RawAnchor>, RenderError> {
    let result = page
        .evaluate(ANCHORS_SCRIPT)
        .await
        .map_err(|e| RenderError::Extraction(e.to_string()))?;

    result
        .into_value::<Vec<RawAnchor>>()
        .map_err(|e| RenderError::Extraction(format!("Failed to parse anchors: {e}")))
}
