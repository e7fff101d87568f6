//! Batch reconciliation: one record per entity, upserted in listing order.
//!
//! Entities are processed strictly one after another with a fixed delay in
//! between. Each entity ends in exactly one `EntityOutcome`; only a failure
//! to list entities (or an upsert failure with `fail_fast`) ends the run
//! early.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info};

use crate::config::ScrapeConfig;
use crate::error::{ReconcileError, StoreError};
use crate::page_renderer::PageRenderer;
use crate::report_extractor::ReportExtractor;
use crate::store::{Entity, ReconciliationRecord, ReportStore};

/// Terminal state of one entity
#[derive(Debug)]
pub enum EntityOutcome {
    /// Rendered and stored
    Upserted { pdf_count: usize },
    /// Page could not be rendered; an empty link list was stored
    Degraded,
    /// Store write failed; the previous record (if any) is left in place
    UpsertFailed { error: StoreError },
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    /// `(entity id, outcome)` in processing order
    pub outcomes: Vec<(i64, EntityOutcome)>,
}

impl BatchSummary {
    #[must_use]
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn upserted(&self) -> usize {
        self.count(|o| matches!(o, EntityOutcome::Upserted { .. }))
    }

    #[must_use]
    pub fn degraded(&self) -> usize {
        self.count(|o| matches!(o, EntityOutcome::Degraded))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, EntityOutcome::UpsertFailed { .. }))
    }

    fn count(&self, pred: impl Fn(&EntityOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

pub struct BatchReconciler<R, S> {
    extractor: ReportExtractor<R>,
    store: Arc<S>,
    entity_delay: Duration,
    fail_fast: bool,
}

impl<R: PageRenderer, S: ReportStore> BatchReconciler<R, S> {
    pub fn new(renderer: R, store: Arc<S>, config: &ScrapeConfig) -> Self {
        Self {
            extractor: ReportExtractor::new(renderer, config),
            store,
            entity_delay: config.entity_delay(),
            fail_fast: config.fail_fast(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn extractor(&self) -> &ReportExtractor<R> {
        &self.extractor
    }

    /// List every entity from the store and reconcile them all.
    pub async fn run(&self) -> Result<BatchSummary, ReconcileError> {
        let entities = self
            .store
            .list_entities()
            .await
            .map_err(ReconcileError::ListEntities)?;

        if entities.is_empty() {
            info!(target: "reportscrape::batch", "No stocks to process");
            return Ok(BatchSummary::default());
        }

        self.run_entities(&entities).await
    }

    /// Reconcile the given entities in order.
    pub async fn run_entities(&self, entities: &[Entity]) -> Result<BatchSummary, ReconcileError> {
        let mut summary = BatchSummary::default();

        for (index, entity) in entities.iter().enumerate() {
            if index > 0 && !self.entity_delay.is_zero() {
                tokio::time::sleep(self.entity_delay).await;
            }

            let outcome = self.reconcile_entity(entity).await;
            if self.fail_fast
                && let EntityOutcome::UpsertFailed { error } = outcome
            {
                return Err(ReconcileError::Upsert {
                    entity_id: entity.id,
                    source: error,
                });
            }
            summary.outcomes.push((entity.id, outcome));
        }

        info!(
            target: "reportscrape::batch",
            "Batch finished: {} processed, {} upserted, {} degraded, {} failed",
            summary.processed(),
            summary.upserted(),
            summary.degraded(),
            summary.failed()
        );
        Ok(summary)
    }

    /// Extract, build the record and upsert it for a single entity.
    pub async fn reconcile_entity(&self, entity: &Entity) -> EntityOutcome {
        info!(target: "reportscrape::batch", "Scraping {}", entity.url);

        let extraction = self.extractor.try_extract(&entity.url).await;
        let degraded = extraction.is_degraded();
        let record = ReconciliationRecord::from_links(entity, extraction.links(), Utc::now());

        match self.store.upsert_record(&record).await {
            Ok(()) => {
                info!(
                    target: "reportscrape::batch",
                    "Upserted {} pdfs: {}",
                    entity.id,
                    record.pdf_links.len()
                );
                if degraded {
                    EntityOutcome::Degraded
                } else {
                    EntityOutcome::Upserted {
                        pdf_count: record.pdf_links.len(),
                    }
                }
            }
            Err(error) => {
                error!(target: "reportscrape::batch", "Error for {}: {error}", entity.id);
                EntityOutcome::UpsertFailed { error }
            }
        }
    }
}
