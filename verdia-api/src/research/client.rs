//! Research provider HTTP client
//!
//! Evidence retrieval queries the Semantic Scholar paper-search API;
//! summarization sends the collected abstracts to a Gemini-style
//! `generateContent` endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::research::provider::{EvidenceSnippet, EvidenceSource};

const SEMANTIC_SCHOLAR_API_URL: &str = "https://api.semanticscholar.org/graph/v1";
const GENERATION_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const USER_AGENT: &str = "Verdia/0.1.0 (ingredient research)";

/// How many papers to pull per ingredient search
const PAPER_LIMIT: usize = 3;

/// Resolved settings for the research client
#[derive(Debug, Clone)]
pub struct ResearchClientSettings {
    pub summary_api_key: String,
    pub summary_model: String,
    pub evidence_base_url: String,
    pub summary_base_url: String,
    pub timeout: Duration,
}

impl ResearchClientSettings {
    /// Settings with default endpoints and model for the given API key
    pub fn new(summary_api_key: String, timeout: Duration) -> Self {
        Self {
            summary_api_key,
            summary_model: DEFAULT_MODEL.to_string(),
            evidence_base_url: SEMANTIC_SCHOLAR_API_URL.to_string(),
            summary_base_url: GENERATION_API_URL.to_string(),
            timeout,
        }
    }
}

/// Production evidence source: paper search plus text generation
pub struct ResearchClient {
    client: reqwest::Client,
    settings: ResearchClientSettings,
}

#[derive(Debug, Deserialize)]
struct PaperSearchResponse {
    #[serde(default)]
    data: Vec<PaperRecord>,
}

#[derive(Debug, Deserialize)]
struct PaperRecord {
    title: String,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<GenerateContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GenerateContent {
    parts: Vec<GeneratePart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeneratePart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GenerateCandidate>,
}

#[derive(Debug, Deserialize)]
struct GenerateCandidate {
    content: GenerateContent,
}

impl ResearchClient {
    pub fn new(settings: ResearchClientSettings) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(settings.timeout)
                .build()
                .expect("Failed to build HTTP client (system error)"),
            settings,
        }
    }

    /// Prompt sent to the generation endpoint. Asks for an uncertainty-
    /// honest reading of the abstracts rather than a scare summary.
    fn summary_prompt(evidence: &[EvidenceSnippet], term: &str) -> String {
        let context = evidence
            .iter()
            .map(|e| format!("{}:\n{}", e.title, e.abstract_text))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "Based on these abstracts, what does current research suggest about \
             the health risks of {}? Be honest about uncertainty. Say 'despite \
             concerns, research suggests...' if appropriate.\n\n{}",
            term, context
        )
    }
}

#[async_trait]
impl EvidenceSource for ResearchClient {
    async fn retrieve_evidence(&self, term: &str) -> Result<Vec<EvidenceSnippet>> {
        debug!(term, "Searching for published research");

        let url = format!("{}/paper/search", self.settings.evidence_base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", term),
                ("limit", &PAPER_LIMIT.to_string()),
                ("fields", "title,abstract,url"),
            ])
            .send()
            .await
            .context("Paper search request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Paper search returned error: {}", response.status());
        }

        let search: PaperSearchResponse = response
            .json()
            .await
            .context("Failed to parse paper search response")?;

        let snippets: Vec<EvidenceSnippet> = search
            .data
            .into_iter()
            .map(|p| EvidenceSnippet {
                title: p.title,
                abstract_text: p.abstract_text.unwrap_or_default(),
                url: p.url,
            })
            .collect();

        debug!(term, count = snippets.len(), "Paper search completed");
        Ok(snippets)
    }

    async fn summarize(&self, evidence: &[EvidenceSnippet], term: &str) -> Result<String> {
        debug!(term, studies = evidence.len(), "Requesting summary generation");

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.settings.summary_base_url, self.settings.summary_model, self.settings.summary_api_key
        );

        let request = GenerateRequest {
            contents: vec![GenerateContent {
                parts: vec![GeneratePart {
                    text: Self::summary_prompt(evidence, term),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Summary generation request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Summary generation returned error: {}", response.status());
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse summary generation response")?;

        let summary = generated
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if summary.trim().is_empty() {
            anyhow::bail!("Summary generation returned no text");
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_search_response_parses() {
        let json = r#"{
            "total": 2,
            "data": [
                {"title": "Aspartame and health", "abstract": "We review...", "url": "https://example.org/1"},
                {"title": "No abstract here", "abstract": null, "url": null}
            ]
        }"#;

        let parsed: PaperSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[0].title, "Aspartame and health");
        assert_eq!(parsed.data[0].abstract_text.as_deref(), Some("We review..."));
        assert!(parsed.data[1].abstract_text.is_none());
    }

    #[test]
    fn empty_paper_search_response_parses() {
        let parsed: PaperSearchResponse = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(parsed.data.is_empty());
    }

    #[test]
    fn generation_response_parses() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Despite concerns, "}, {"text": "research suggests..."}]}}
            ]
        }"#;

        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        let text: String = parsed.candidates[0]
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(text, "Despite concerns, research suggests...");
    }

    #[test]
    fn prompt_includes_term_and_abstracts() {
        let evidence = vec![EvidenceSnippet {
            title: "Study A".to_string(),
            abstract_text: "Findings...".to_string(),
            url: None,
        }];

        let prompt = ResearchClient::summary_prompt(&evidence, "aspartame");
        assert!(prompt.contains("aspartame"));
        assert!(prompt.contains("Study A"));
        assert!(prompt.contains("Findings..."));
    }

    #[tokio::test]
    #[ignore] // Requires network access - run with: cargo test -- --ignored
    async fn paper_search_against_live_api() {
        let client = ResearchClient::new(ResearchClientSettings::new(
            String::new(),
            Duration::from_secs(30),
        ));

        let result = client.retrieve_evidence("aspartame").await;
        assert!(result.is_ok(), "Paper search failed: {:?}", result.err());
    }
}
