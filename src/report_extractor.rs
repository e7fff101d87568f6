//! Render a page and turn its anchors into normalized PDF links.
//!
//! Rendering is retried up to `max_retries` times with a linear backoff
//! (`retry_backoff × attempt`). A page that never renders yields an empty
//! link list, never an error: the batch treats it as a degraded entity.

use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::error::RenderError;
use crate::link_normalizer::normalize_all;
use crate::page_renderer::PageRenderer;
use crate::store::NormalizedLink;

/// How an extraction ended
#[derive(Debug)]
pub enum ExtractOutcome {
    /// Page rendered; `links` may still be empty
    Links {
        links: Vec<NormalizedLink>,
        attempts: u32,
    },
    /// Every attempt failed; `error` is the last one
    RenderFailed { attempts: u32, error: RenderError },
    /// The page URL could not be parsed, so nothing was rendered
    InvalidUrl { error: url::ParseError },
}

impl ExtractOutcome {
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !matches!(self, ExtractOutcome::Links { .. })
    }

    #[must_use]
    pub fn links(&self) -> &[NormalizedLink] {
        match self {
            ExtractOutcome::Links { links, .. } => links,
            _ => &[],
        }
    }

    #[must_use]
    pub fn into_links(self) -> Vec<NormalizedLink> {
        match self {
            ExtractOutcome::Links { links, .. } => links,
            _ => Vec::new(),
        }
    }
}

pub struct ReportExtractor<R> {
    renderer: R,
    max_retries: u32,
    retry_backoff: Duration,
}

impl<R: PageRenderer> ReportExtractor<R> {
    pub fn new(renderer: R, config: &ScrapeConfig) -> Self {
        Self {
            renderer,
            max_retries: config.max_retries().max(1),
            retry_backoff: config.retry_backoff(),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Extract PDF links from `url`, returning an empty list on failure.
    pub async fn extract_reports(&self, url: &str) -> Vec<NormalizedLink> {
        self.try_extract(url).await.into_links()
    }

    /// Extract PDF links from `url`, reporting how the attempt ended.
    pub async fn try_extract(&self, url: &str) -> ExtractOutcome {
        let base = match Url::parse(url) {
            Ok(base) => base,
            Err(error) => {
                warn!(target: "reportscrape::extract", "Invalid page URL {url:?}: {error}");
                return ExtractOutcome::InvalidUrl { error };
            }
        };

        let mut attempt = 1;
        loop {
            match self.renderer.render(url).await {
                Ok(anchors) => {
                    let links = normalize_all(&anchors, &base);
                    debug!(
                        target: "reportscrape::extract",
                        "{url}: {} anchors, {} PDF links (attempt {attempt})",
                        anchors.len(),
                        links.len()
                    );
                    return ExtractOutcome::Links {
                        links,
                        attempts: attempt,
                    };
                }
                Err(error) => {
                    warn!(
                        target: "reportscrape::extract",
                        "Render attempt {attempt}/{} failed for {url}: {error}",
                        self.max_retries
                    );
                    if attempt >= self.max_retries {
                        return ExtractOutcome::RenderFailed {
                            attempts: attempt,
                            error,
                        };
                    }
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                    attempt += 1;
                }
            }
        }
    }
}
