//! Flags produced by classifying a product's ingredient text

use crate::models::Severity;
use serde::{Deserialize, Serialize};

/// One flagged ingredient token. Transient: built per scan, never stored.
///
/// `matched` flags come from the catalog and carry that record's category,
/// severity, and health concerns. `heuristic` flags come from the pattern
/// library and always carry the "Auto-Flagged" category at moderate
/// severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientFlag {
    /// Ingredient text as it appeared on the label (trimmed)
    pub ingredient_text: String,
    /// Canonical lookup key (lowercase, trimmed)
    pub normalized_key: String,
    /// True when the flag comes from an exact catalog match
    pub matched: bool,
    /// Category name ("Auto-Flagged" for heuristic flags)
    pub category: String,
    pub severity: Severity,
    pub health_concerns: Vec<String>,
    /// True when the flag comes from the heuristic pattern library
    pub heuristic: bool,
    /// Whether a research summary is already stored for this ingredient
    pub has_research_summary: bool,
}

/// Category name used for heuristic flags
pub const AUTO_FLAGGED_CATEGORY: &str = "Auto-Flagged";

impl IngredientFlag {
    /// Flag for an ingredient matched against the catalog
    pub fn matched(
        ingredient_text: &str,
        normalized_key: String,
        category: String,
        severity: Severity,
        health_concerns: Vec<String>,
        has_research_summary: bool,
    ) -> Self {
        Self {
            ingredient_text: ingredient_text.to_string(),
            normalized_key,
            matched: true,
            category,
            severity,
            health_concerns,
            heuristic: false,
            has_research_summary,
        }
    }

    /// Flag for an ingredient caught by the heuristic pattern library
    pub fn heuristic(ingredient_text: &str, normalized_key: String) -> Self {
        Self {
            ingredient_text: ingredient_text.to_string(),
            normalized_key,
            matched: false,
            category: AUTO_FLAGGED_CATEGORY.to_string(),
            severity: Severity::Moderate,
            health_concerns: Vec::new(),
            heuristic: true,
            has_research_summary: false,
        }
    }
}
