//! Research brief generation
//!
//! `provider` defines the evidence-source contract, `client` implements it
//! against the real paper-search and text-generation APIs, and
//! `coordinator` turns a flagged ingredient into a cached brief exactly
//! once with pollable progress.

pub mod client;
pub mod coordinator;
pub mod provider;

pub use client::{ResearchClient, ResearchClientSettings};
pub use coordinator::BriefCoordinator;
pub use provider::{EvidenceSnippet, EvidenceSource};
