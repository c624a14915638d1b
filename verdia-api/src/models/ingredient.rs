//! Watchlist catalog models: ingredient records and categories

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Concern severity attached to categories and individual ingredients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Moderate,
    High,
    Critical,
}

impl Severity {
    /// Database/text representation (lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Parse the lowercase text representation
    pub fn parse(s: &str) -> Option<Severity> {
        match s {
            "low" => Some(Severity::Low),
            "moderate" => Some(Severity::Moderate),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

/// An ingredient category (e.g. "Preservatives", "Artificial Sweeteners")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub severity: Severity,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new active category
    pub fn new(name: String, description: String, severity: Severity) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            severity,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A watchlisted ingredient. `name` and `aliases` are stored lowercase so
/// catalog lookups by normalized key need no further case handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientRecord {
    pub id: Uuid,
    pub name: String,
    pub aliases: Vec<String>,
    pub category_id: Uuid,
    pub severity: Severity,
    pub health_concerns: Vec<String>,
    pub research_summary: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IngredientRecord {
    /// Create a new active record. Name and aliases are lowercased and
    /// trimmed on the way in.
    pub fn new(
        name: &str,
        aliases: Vec<String>,
        category_id: Uuid,
        severity: Severity,
        health_concerns: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_lowercase(),
            aliases: aliases
                .into_iter()
                .map(|a| a.trim().to_lowercase())
                .filter(|a| !a.is_empty())
                .collect(),
            category_id,
            severity,
            health_concerns,
            research_summary: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a non-empty research summary is stored on the record
    pub fn has_research_summary(&self) -> bool {
        self.research_summary
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_text_roundtrip() {
        for severity in [
            Severity::Low,
            Severity::Moderate,
            Severity::High,
            Severity::Critical,
        ] {
            assert_eq!(Severity::parse(severity.as_str()), Some(severity));
        }
        assert_eq!(Severity::parse("extreme"), None);
    }

    #[test]
    fn new_record_normalizes_name_and_aliases() {
        let record = IngredientRecord::new(
            " Aspartame ",
            vec!["E951".to_string(), "  ".to_string()],
            Uuid::new_v4(),
            Severity::Moderate,
            vec![],
        );
        assert_eq!(record.name, "aspartame");
        assert_eq!(record.aliases, vec!["e951".to_string()]);
    }

    #[test]
    fn has_research_summary_ignores_blank() {
        let mut record = IngredientRecord::new("aspartame", vec![], Uuid::new_v4(), Severity::Moderate, vec![]);
        assert!(!record.has_research_summary());
        record.research_summary = Some("   ".to_string());
        assert!(!record.has_research_summary());
        record.research_summary = Some("Research suggests...".to_string());
        assert!(record.has_research_summary());
    }
}
