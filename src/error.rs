//! Error types for rendering, storage, configuration and batch runs
//!
//! Only `ConfigError` and `ReconcileError` ever reach the binary. Render
//! failures are absorbed by the report extractor and store write failures by
//! the batch loop; both still carry enough context to be logged usefully.

use thiserror::Error;

/// Failure of a single page render attempt
#[derive(Debug, Error)]
pub enum RenderError {
    /// Browser could not be found, downloaded or started
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    /// Navigation failed before the page loaded
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// Navigation exceeded its time budget
    #[error("{operation} timeout after {secs} seconds")]
    Timeout { operation: String, secs: u64 },

    /// Anchor extraction script failed or returned an unexpected shape
    #[error("Failed to extract anchors: {0}")]
    Extraction(String),
}

impl From<anyhow::Error> for RenderError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the context chain
        RenderError::Launch(format!("{err:#}"))
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a `ReportStore` backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite backend error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// PostgREST answered with a non-success status
    #[error("Store request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    /// Transport-level failure talking to the REST endpoint
    #[error("Store request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Serialization of a record or deserialization of a row failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Fatal startup configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("Invalid value {value:?} for {name}: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that abort a whole batch run
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The entity list could not be fetched
    #[error("Failed to list entities: {0}")]
    ListEntities(#[source] StoreError),

    /// Upsert failed while the batch runs with `fail_fast`
    #[error("Upsert failed for entity {entity_id}: {source}")]
    Upsert {
        entity_id: i64,
        #[source]
        source: StoreError,
    },
}
