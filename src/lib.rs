pub mod browser_setup;
pub mod config;
pub mod error;
pub mod link_normalizer;
pub mod page_renderer;
pub mod reconciler;
pub mod report_extractor;
pub mod store;
pub mod utils;

pub use browser_setup::{BrowserSession, download_managed_browser, find_browser_executable};
pub use config::{ScrapeConfig, StoreConfig};
pub use error::{ConfigError, ReconcileError, RenderError, StoreError, StoreResult};
pub use link_normalizer::{normalize, normalize_all};
pub use page_renderer::{ChromiumRenderer, PageRenderer};
pub use reconciler::{BatchReconciler, BatchSummary, EntityOutcome};
pub use report_extractor::{ExtractOutcome, ReportExtractor};
pub use store::{
    Entity, NormalizedLink, RawAnchor, ReconciliationRecord, ReportStore, SqliteStore,
    SupabaseStore,
};
