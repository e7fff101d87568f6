//! Test utilities shared by the reportscrape test suite

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use reportscrape::{
    Entity, PageRenderer, RawAnchor, ReconciliationRecord, RenderError, ReportStore,
    ScrapeConfig, SqliteStore, StoreError, StoreResult,
};
use tempfile::TempDir;

/// Renderer serving canned anchors per URL.
///
/// Unknown URLs fail like an unreachable host. A URL registered with
/// `with_flaky_page` fails its first `n` renders, then succeeds.
#[derive(Default)]
pub struct MockRenderer {
    pages: HashMap<String, Vec<RawAnchor>>,
    failures: HashMap<String, usize>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, anchors: Vec<RawAnchor>) -> Self {
        self.pages.insert(url.to_string(), anchors);
        self
    }

    pub fn with_flaky_page(mut self, url: &str, failures: usize, anchors: Vec<RawAnchor>) -> Self {
        self.failures.insert(url.to_string(), failures);
        self.with_page(url, anchors)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == url).count()
    }
}

#[async_trait]
impl PageRenderer for MockRenderer {
    async fn render(&self, url: &str) -> Result<Vec<RawAnchor>, RenderError> {
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(url.to_string());
            calls.iter().filter(|c| *c == url).count()
        };

        if self.failures.get(url).is_some_and(|&n| attempt <= n) {
            return Err(RenderError::Timeout {
                operation: "Navigation".to_string(),
                secs: 60,
            });
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| RenderError::Navigation {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            })
    }
}

/// SQLite store wrapper that can be told to fail listing or specific upserts.
#[allow(dead_code)]
pub struct FlakyStore {
    pub inner: SqliteStore,
    pub fail_listing: bool,
    pub fail_upserts_for: HashSet<i64>,
    pub upsert_order: Mutex<Vec<i64>>,
}

#[allow(dead_code)]
impl FlakyStore {
    pub fn new(inner: SqliteStore) -> Self {
        Self {
            inner,
            fail_listing: false,
            fail_upserts_for: HashSet::new(),
            upsert_order: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_upserts(mut self, ids: &[i64]) -> Self {
        self.fail_upserts_for.extend(ids.iter().copied());
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn upsert_order(&self) -> Vec<i64> {
        self.upsert_order.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportStore for FlakyStore {
    async fn list_entities(&self) -> StoreResult<Vec<Entity>> {
        if self.fail_listing {
            return Err(StoreError::Http {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        self.inner.list_entities().await
    }

    async fn upsert_record(&self, record: &ReconciliationRecord) -> StoreResult<()> {
        self.upsert_order.lock().unwrap().push(record.stock_id);
        if self.fail_upserts_for.contains(&record.stock_id) {
            return Err(StoreError::Http {
                status: 500,
                body: "upsert rejected".to_string(),
            });
        }
        self.inner.upsert_record(record).await
    }
}

/// Config with no delays, for fast tests.
#[allow(dead_code)]
pub fn fast_config() -> ScrapeConfig {
    ScrapeConfig::builder()
        .entity_delay_ms(0)
        .retry_backoff_ms(0)
        .build()
        .unwrap()
}

/// Open a fresh SQLite store in a temp dir (keep the dir alive for the test).
#[allow(dead_code)]
pub async fn temp_store() -> (TempDir, SqliteStore) {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open(&dir.path().join("reports.sqlite"))
        .await
        .unwrap();
    (dir, store)
}

pub const ACME_URL: &str = "https://acme.example/reports";

/// Anchors of the Acme investor page: two PDFs and a nav link.
#[allow(dead_code)]
pub fn acme_anchors() -> Vec<RawAnchor> {
    vec![
        RawAnchor::new("/docs/q1.pdf", "Q1"),
        RawAnchor::new("https://cdn.example/q2.PDF?x=1", ""),
        RawAnchor::new("/about", "About"),
    ]
}

#[allow(dead_code)]
pub fn acme() -> Entity {
    Entity::new(1, "Acme", ACME_URL)
}
