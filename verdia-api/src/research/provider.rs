//! Evidence source contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One piece of published evidence about an ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceSnippet {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// External research provider: retrieves evidence snippets for an
/// ingredient term and produces a narrative summary from them.
///
/// An empty retrieval result is a legitimate outcome, not an error.
/// Either call may fail or time out; the coordinator records those as a
/// failed generation and never propagates them to request handlers.
#[async_trait]
pub trait EvidenceSource: Send + Sync {
    /// Retrieve up to a bounded number of evidence snippets for `term`
    async fn retrieve_evidence(&self, term: &str) -> anyhow::Result<Vec<EvidenceSnippet>>;

    /// Produce a plain-language summary of `evidence` for `term`
    async fn summarize(&self, evidence: &[EvidenceSnippet], term: &str) -> anyhow::Result<String>;
}
