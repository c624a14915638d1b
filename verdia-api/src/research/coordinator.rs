//! Brief generation coordination
//!
//! One generation per normalized ingredient key, no matter how many
//! clients ask at once. The durable summary cache is checked first; on a
//! miss, the in-memory job table decides whether to join an in-flight
//! generation or start a new one. The check-then-create step runs under
//! the table lock, so concurrent requests for the same key collapse onto
//! a single spawned generation task.
//!
//! Requests never block on provider I/O: `request_brief` returns a
//! snapshot immediately and the generation task reports progress through
//! the job table, which pollers read via `get_progress`.

use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{info, warn};
use verdia_common::Result;

use crate::db::{briefs, catalog};
use crate::matcher::normalize_key;
use crate::models::{BriefJob, BriefSnapshot, BriefStatus};
use crate::research::provider::EvidenceSource;

/// Coordinates brief generation per normalized ingredient key.
///
/// Cheap to clone; clones share the job table. A clone moves into each
/// spawned generation task.
#[derive(Clone)]
pub struct BriefCoordinator {
    db: SqlitePool,
    source: Arc<dyn EvidenceSource>,
    jobs: Arc<Mutex<HashMap<String, BriefJob>>>,
    provider_timeout: Duration,
}

impl BriefCoordinator {
    pub fn new(db: SqlitePool, source: Arc<dyn EvidenceSource>, provider_timeout: Duration) -> Self {
        Self {
            db,
            source,
            jobs: Arc::new(Mutex::new(HashMap::new())),
            provider_timeout,
        }
    }

    /// Request a research brief for an ingredient.
    ///
    /// Served from the durable cache when possible; otherwise joins the
    /// in-flight generation for the key or starts a new one. Returns
    /// without waiting on provider I/O. A blank ingredient yields a
    /// NOT_STARTED snapshot, not an error. Only an unreachable store
    /// produces an `Err`.
    pub async fn request_brief(&self, ingredient: &str) -> Result<BriefSnapshot> {
        let key = normalize_key(ingredient);
        if key.is_empty() {
            return Ok(BriefSnapshot::not_started(ingredient));
        }

        // Fast path: completed summaries are served from the cache and
        // never touch the research provider again
        if let Some(summary) = briefs::get_summary(&self.db, &key).await? {
            return Ok(BriefSnapshot::completed(&key, summary));
        }

        // Check-then-create is one critical section: a second caller
        // racing here either sees the in-flight job and joins it, or
        // finds a FAILED/absent entry and starts the only new cycle
        let snapshot = {
            let mut jobs = self.jobs.lock().await;
            match jobs.get(&key) {
                Some(job) if job.status.in_progress() || job.status == BriefStatus::Completed => {
                    return Ok(job.snapshot());
                }
                _ => {
                    let job = BriefJob::new(&key);
                    let snapshot = job.snapshot();
                    jobs.insert(key.clone(), job);
                    snapshot
                }
            }
        };

        let coordinator = self.clone();
        tokio::spawn(async move {
            coordinator.run_generation(&key).await;
        });

        Ok(snapshot)
    }

    /// Current progress for an ingredient. Read-only: never starts work.
    ///
    /// Keys with no job fall back to the durable cache (COMPLETED after a
    /// restart), then to NOT_STARTED.
    pub async fn get_progress(&self, ingredient: &str) -> Result<BriefSnapshot> {
        let key = normalize_key(ingredient);
        if key.is_empty() {
            return Ok(BriefSnapshot::not_started(ingredient));
        }

        if let Some(job) = self.jobs.lock().await.get(&key) {
            return Ok(job.snapshot());
        }

        if let Some(summary) = briefs::get_summary(&self.db, &key).await? {
            return Ok(BriefSnapshot::completed(&key, summary));
        }

        Ok(BriefSnapshot::not_started(&key))
    }

    /// Generation task for one key. Runs off the request path; every
    /// failure ends as a FAILED job entry, never a propagated error.
    async fn run_generation(&self, key: &str) {
        info!(ingredient = %key, "Starting research brief generation");

        let evidence = match timeout(self.provider_timeout, self.source.retrieve_evidence(key)).await
        {
            Err(_) => {
                self.fail_job(key, "research search timed out").await;
                return;
            }
            Ok(Err(e)) => {
                warn!(ingredient = %key, error = %e, "Evidence retrieval failed");
                self.fail_job(key, &format!("research search failed: {}", e))
                    .await;
                return;
            }
            Ok(Ok(evidence)) => evidence,
        };

        if evidence.is_empty() {
            // Negative results are not cached: the next request retries
            // the search instead of repeating this failure forever
            self.fail_job(key, "no research found for this ingredient")
                .await;
            return;
        }

        self.update_job(key, |job| {
            job.summarizing(format!("summarizing {} studies", evidence.len()));
        })
        .await;

        let summary = match timeout(
            self.provider_timeout,
            self.source.summarize(&evidence, key),
        )
        .await
        {
            Err(_) => {
                self.fail_job(key, "summary generation timed out").await;
                return;
            }
            Ok(Err(e)) => {
                warn!(ingredient = %key, error = %e, "Summary generation failed");
                self.fail_job(key, &format!("summary generation failed: {}", e))
                    .await;
                return;
            }
            Ok(Ok(summary)) => summary,
        };

        // The durable cache write must land before the job turns
        // COMPLETED, so a completed status always implies a cached entry
        if let Err(e) = briefs::store_summary(&self.db, key, &summary).await {
            warn!(ingredient = %key, error = %e, "Failed to store research summary");
            self.fail_job(key, "could not store research summary").await;
            return;
        }

        self.update_job(key, |job| job.complete(summary.clone())).await;
        info!(ingredient = %key, "Research brief completed");

        // Best-effort: backfill the catalog record so future scans report
        // the summary as available. Never fails the brief itself.
        match catalog::find_by_name_or_alias(&self.db, key).await {
            Ok(Some(record)) if !record.has_research_summary() => {
                if let Err(e) = catalog::set_research_summary_if_missing(&self.db, record.id, &summary).await {
                    warn!(ingredient = %key, error = %e, "Catalog summary backfill failed");
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!(ingredient = %key, error = %e, "Catalog lookup for summary backfill failed");
            }
        }
    }

    async fn update_job(&self, key: &str, f: impl FnOnce(&mut BriefJob)) {
        let mut jobs = self.jobs.lock().await;
        if let Some(job) = jobs.get_mut(key) {
            f(job);
        }
    }

    async fn fail_job(&self, key: &str, message: &str) {
        warn!(ingredient = %key, message, "Research brief generation failed");
        self.update_job(key, |job| job.fail(message.to_string())).await;
    }
}
