//! Durable store for entity lists and per-entity PDF link records.
//!
//! The batch reconciler only needs two operations: list every entity, and
//! upsert one record keyed by entity id. Backends:
//! - `SupabaseStore`: PostgREST over HTTP (production)
//! - `SqliteStore`: local SQLite file via sqlx (local runs, tests)

pub mod sqlite;
pub mod supabase;
pub mod types;

use async_trait::async_trait;

use crate::error::StoreResult;

pub use sqlite::SqliteStore;
pub use supabase::SupabaseStore;
pub use types::{Entity, NormalizedLink, RawAnchor, ReconciliationRecord};

/// Entity source plus record sink.
///
/// `upsert_record` must replace every non-key field of an existing row with
/// the same `stock_id`, never merge and never duplicate. Each call is its own
/// atomic unit.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn list_entities(&self) -> StoreResult<Vec<Entity>>;

    async fn upsert_record(&self, record: &ReconciliationRecord) -> StoreResult<()>;
}
