//! Research brief generation state machine
//!
//! A brief job progresses SEARCHING → SUMMARIZING → COMPLETED, or ends in
//! FAILED. COMPLETED is terminal; FAILED is retryable, and the next
//! request for the same key starts a fresh cycle. Keys never seen have
//! the implicit NOT_STARTED state and are not materialized as jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Brief generation state for one normalized ingredient key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BriefStatus {
    /// No generation has been requested for this key
    NotStarted,
    /// Retrieving evidence from the research provider
    Searching,
    /// Evidence found, producing the plain-language summary
    Summarizing,
    /// Summary generated and cached
    Completed,
    /// Generation failed; retried on the next request
    Failed,
}

impl BriefStatus {
    /// Whether a generation task is currently running for this job.
    /// In-flight jobs are joined by concurrent requests, never duplicated.
    pub fn in_progress(&self) -> bool {
        matches!(self, BriefStatus::Searching | BriefStatus::Summarizing)
    }
}

/// In-memory generation job for one key. Created on the first uncached
/// request, mutated only by the coordinator's generation task, replaced on
/// retry after FAILED.
#[derive(Debug, Clone)]
pub struct BriefJob {
    pub key: String,
    pub status: BriefStatus,
    pub message: String,
    pub summary: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl BriefJob {
    /// New job entering SEARCHING
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            status: BriefStatus::Searching,
            message: "searching for published research".to_string(),
            summary: None,
            updated_at: Utc::now(),
        }
    }

    /// Move to SUMMARIZING
    pub fn summarizing(&mut self, message: String) {
        self.status = BriefStatus::Summarizing;
        self.message = message;
        self.updated_at = Utc::now();
    }

    /// Terminal success: attach the generated summary
    pub fn complete(&mut self, summary: String) {
        self.status = BriefStatus::Completed;
        self.message = "research brief ready".to_string();
        self.summary = Some(summary);
        self.updated_at = Utc::now();
    }

    /// Record a failure; the job stays in the table so pollers see the
    /// message, and the next request replaces it
    pub fn fail(&mut self, message: String) {
        self.status = BriefStatus::Failed;
        self.message = message;
        self.summary = None;
        self.updated_at = Utc::now();
    }

    /// Point-in-time view handed to pollers
    pub fn snapshot(&self) -> BriefSnapshot {
        BriefSnapshot {
            ingredient: self.key.clone(),
            status: self.status,
            message: self.message.clone(),
            summary: self.summary.clone(),
            in_progress: self.status.in_progress(),
        }
    }
}

/// Progress snapshot returned to callers of request/poll operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefSnapshot {
    pub ingredient: String,
    pub status: BriefStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub in_progress: bool,
}

impl BriefSnapshot {
    /// Snapshot for a key with no job and no cached summary
    pub fn not_started(ingredient: &str) -> Self {
        Self {
            ingredient: ingredient.to_string(),
            status: BriefStatus::NotStarted,
            message: "no research brief has been requested".to_string(),
            summary: None,
            in_progress: false,
        }
    }

    /// Snapshot for a summary served from the durable cache
    pub fn completed(ingredient: &str, summary: String) -> Self {
        Self {
            ingredient: ingredient.to_string(),
            status: BriefStatus::Completed,
            message: "research brief ready".to_string(),
            summary: Some(summary),
            in_progress: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_is_searching() {
        let job = BriefJob::new("aspartame");
        assert_eq!(job.status, BriefStatus::Searching);
        assert!(job.status.in_progress());
        assert!(job.summary.is_none());
    }

    #[test]
    fn full_transition_path() {
        let mut job = BriefJob::new("aspartame");
        job.summarizing("summarizing 3 studies".to_string());
        assert_eq!(job.status, BriefStatus::Summarizing);
        assert!(job.status.in_progress());

        job.complete("Research suggests...".to_string());
        assert_eq!(job.status, BriefStatus::Completed);
        assert!(!job.status.in_progress());
        assert_eq!(job.summary.as_deref(), Some("Research suggests..."));
    }

    #[test]
    fn failed_job_clears_summary() {
        let mut job = BriefJob::new("aspartame");
        job.fail("no research found for this ingredient".to_string());
        assert_eq!(job.status, BriefStatus::Failed);
        assert!(!job.status.in_progress());
        assert!(job.summary.is_none());
        assert_eq!(job.snapshot().message, "no research found for this ingredient");
    }

    #[test]
    fn status_serializes_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&BriefStatus::NotStarted).unwrap(),
            "\"NOT_STARTED\""
        );
        assert_eq!(
            serde_json::to_string(&BriefStatus::Summarizing).unwrap(),
            "\"SUMMARIZING\""
        );
    }
}
