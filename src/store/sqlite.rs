//! SQLite-backed report store.
//!
//! Mirrors the hosted schema closely enough that the batch reconciler can
//! run locally without a Supabase project:
//! - `stocks`: the entity list (read by `list_entities`)
//! - `stock_details`: one row per stock id, replaced on every upsert

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tracing::debug;

use super::ReportStore;
use super::types::{Entity, ReconciliationRecord};
use crate::error::{StoreError, StoreResult};

/// SQL schema for the local store
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS stocks (
    id INTEGER PRIMARY KEY,
    name TEXT,
    url TEXT NOT NULL
);

-- stock_id is the upsert conflict key
CREATE TABLE IF NOT EXISTS stock_details (
    stock_id INTEGER PRIMARY KEY,
    stock_name TEXT,
    stock_url TEXT NOT NULL,
    title TEXT,
    pdf_links TEXT NOT NULL,
    scraped_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

type RecordRow = (i64, Option<String>, String, Option<String>, String, String, String);

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open an existing database file or create a new one.
    pub async fn open(db_path: &Path) -> StoreResult<Self> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Database(sqlx::Error::Io(e)))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        // Idempotent - CREATE IF NOT EXISTS
        sqlx::query(SCHEMA_SQL).execute(&pool).await?;

        debug!(target: "reportscrape::store", "Opened SQLite store at {}", db_path.display());
        Ok(Self { pool })
    }

    /// Insert or replace an entity in the `stocks` table.
    pub async fn insert_entity(&self, entity: &Entity) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO stocks (id, name, url) VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                url = excluded.url
            "#,
        )
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.url)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Fetch the stored record for a stock id, if any.
    pub async fn get_record(&self, stock_id: i64) -> StoreResult<Option<ReconciliationRecord>> {
        let row: Option<RecordRow> = sqlx::query_as(
            r#"
            SELECT stock_id, stock_name, stock_url, title, pdf_links, scraped_at, updated_at
            FROM stock_details
            WHERE stock_id = ?
            "#,
        )
        .bind(stock_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(record_from_row).transpose()
    }

    /// Number of rows in `stock_details`.
    pub async fn record_count(&self) -> StoreResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM stock_details")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    /// Close the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ReportStore for SqliteStore {
    async fn list_entities(&self) -> StoreResult<Vec<Entity>> {
        let rows: Vec<(i64, Option<String>, String)> =
            sqlx::query_as("SELECT id, name, url FROM stocks ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, url)| Entity { id, name, url })
            .collect())
    }

    async fn upsert_record(&self, record: &ReconciliationRecord) -> StoreResult<()> {
        let pdf_links = serde_json::to_string(&record.pdf_links)?;

        sqlx::query(
            r#"
            INSERT INTO stock_details
                (stock_id, stock_name, stock_url, title, pdf_links, scraped_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(stock_id) DO UPDATE SET
                stock_name = excluded.stock_name,
                stock_url = excluded.stock_url,
                title = excluded.title,
                pdf_links = excluded.pdf_links,
                scraped_at = excluded.scraped_at,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(record.stock_id)
        .bind(&record.stock_name)
        .bind(&record.stock_url)
        .bind(&record.title)
        .bind(&pdf_links)
        .bind(record.scraped_at.to_rfc3339())
        .bind(record.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn record_from_row(row: RecordRow) -> StoreResult<ReconciliationRecord> {
    let (stock_id, stock_name, stock_url, title, pdf_links, scraped_at, updated_at) = row;
    Ok(ReconciliationRecord {
        stock_id,
        stock_name,
        stock_url,
        title,
        pdf_links: serde_json::from_str(&pdf_links)?,
        scraped_at: parse_timestamp(&scraped_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn parse_timestamp(value: &str) -> StoreResult<DateTime<Utc>> {
    value
        .parse::<DateTime<Utc>>()
        .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))
}
