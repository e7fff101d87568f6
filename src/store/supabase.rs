//! Supabase (PostgREST) report store.
//!
//! Entities come from `GET /rest/v1/<entity_table>?select=*`; records are
//! written with `POST /rest/v1/<record_table>?on_conflict=stock_id` and
//! `Prefer: resolution=merge-duplicates`, which turns the insert into an
//! upsert on the conflict column.

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, warn};

use super::ReportStore;
use super::types::{Entity, ReconciliationRecord};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

const CONFLICT_KEY: &str = "stock_id";
const UPSERT_PREFER: &str = "resolution=merge-duplicates,return=minimal";

#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    rest_base: String,
    api_key: String,
    entity_table: String,
    record_table: String,
}

impl SupabaseStore {
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    #[must_use]
    pub fn with_client(client: Client, config: &StoreConfig) -> Self {
        Self {
            client,
            rest_base: format!("{}/rest/v1", config.url().trim_end_matches('/')),
            api_key: config.service_role_key().to_string(),
            entity_table: config.entity_table().to_string(),
            record_table: config.record_table().to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_base, table)
    }
}

#[async_trait]
impl ReportStore for SupabaseStore {
    async fn list_entities(&self) -> StoreResult<Vec<Entity>> {
        let response = self
            .client
            .get(self.table_url(&self.entity_table))
            .query(&[("select", "*")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let rows: Vec<serde_json::Value> = response.json().await?;
        let total = rows.len();
        let entities: Vec<Entity> = rows.into_iter().filter_map(decode_entity).collect();
        debug!(
            target: "reportscrape::store",
            "Fetched {} entities from {} ({} rows skipped)",
            entities.len(),
            self.entity_table,
            total - entities.len()
        );
        Ok(entities)
    }

    async fn upsert_record(&self, record: &ReconciliationRecord) -> StoreResult<()> {
        let response = self
            .client
            .post(self.table_url(&self.record_table))
            .query(&[("on_conflict", CONFLICT_KEY)])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", UPSERT_PREFER)
            .json(record)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}

/// Decode one row, skipping (and logging) rows that cannot name an entity.
fn decode_entity(row: serde_json::Value) -> Option<Entity> {
    let id = row
        .get("id")
        .map_or_else(|| "none".to_string(), ToString::to_string);
    match serde_json::from_value::<Entity>(row) {
        Ok(entity) => Some(entity),
        Err(e) => {
            warn!(target: "reportscrape::store", "Skipping malformed entity row (id {id}): {e}");
            None
        }
    }
}

async fn ensure_success(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Http {
        status: status.as_u16(),
        body,
    })
}
