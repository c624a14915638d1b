//! Ingredient classification against the watchlist catalog
//!
//! Raw ingredient text is split on commas and each token is checked
//! against the catalog (exact name or alias, case-insensitive). Tokens
//! the catalog doesn't know are run through an ordered heuristic rule
//! library covering chemical naming conventions and common additive
//! families. A catalog hit always wins over a heuristic hit. Tokens
//! matching neither are simply not flagged.

use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::SqlitePool;
use tracing::debug;
use verdia_common::Result;

use crate::db::catalog;
use crate::models::IngredientFlag;

/// Canonical lookup key for an ingredient name: lowercase, trimmed.
/// Every cache and job lookup goes through this, so "Aspartame" and
/// " aspartame " resolve to the same entry.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

enum RuleKind {
    /// Token ends with the given suffix (chemical naming conventions)
    Suffix(&'static str),
    /// Token contains the given substring (known additive families)
    Substring(&'static str),
    /// Token matches the regex (numbered dyes and the like)
    Pattern(Regex),
}

/// One heuristic rule, tagged with the additive family it represents.
/// The table is ordered; the first matching rule wins.
pub struct HeuristicRule {
    pub family: &'static str,
    kind: RuleKind,
}

impl HeuristicRule {
    fn suffix(family: &'static str, suffix: &'static str) -> Self {
        Self {
            family,
            kind: RuleKind::Suffix(suffix),
        }
    }

    fn substring(family: &'static str, needle: &'static str) -> Self {
        Self {
            family,
            kind: RuleKind::Substring(needle),
        }
    }

    fn pattern(family: &'static str, pattern: &'static str) -> Self {
        Self {
            family,
            // Patterns are compile-time constants; a bad one is a bug
            kind: RuleKind::Pattern(Regex::new(pattern).expect("invalid heuristic pattern")),
        }
    }

    fn matches(&self, key: &str) -> bool {
        match &self.kind {
            RuleKind::Suffix(suffix) => key.ends_with(suffix),
            RuleKind::Substring(needle) => key.contains(needle),
            RuleKind::Pattern(regex) => regex.is_match(key),
        }
    }
}

static HEURISTIC_RULES: Lazy<Vec<HeuristicRule>> = Lazy::new(|| {
    vec![
        // Chemical-sounding suffixes
        HeuristicRule::suffix("chemical suffix", "ate"),
        HeuristicRule::suffix("chemical suffix", "ide"),
        HeuristicRule::suffix("chemical suffix", "ene"),
        HeuristicRule::suffix("chemical suffix", "ol"),
        HeuristicRule::suffix("chemical suffix", "ium"),
        // Common preservatives
        HeuristicRule::substring("preservative", "benzoate"),
        HeuristicRule::substring("preservative", "sorbate"),
        HeuristicRule::substring("preservative", "nitrate"),
        HeuristicRule::substring("preservative", "nitrite"),
        HeuristicRule::substring("preservative", "sulfite"),
        HeuristicRule::substring("preservative", "phosphate"),
        HeuristicRule::substring("preservative", "propionate"),
        // Artificial colors and flavors
        HeuristicRule::pattern("numbered dye", r"red\s*\d+"),
        HeuristicRule::pattern("numbered dye", r"yellow\s*\d+"),
        HeuristicRule::pattern("numbered dye", r"blue\s*\d+"),
        HeuristicRule::pattern("numbered dye", r"green\s*\d+"),
        HeuristicRule::substring("artificial", "artificial"),
        HeuristicRule::substring("artificial", "synthetic"),
        // Emulsifiers and thickeners
        HeuristicRule::substring("emulsifier", "gum"),
        HeuristicRule::substring("emulsifier", "carrageenan"),
        HeuristicRule::substring("emulsifier", "polysorbate"),
        HeuristicRule::substring("emulsifier", "lecithin"),
        HeuristicRule::substring("emulsifier", "diglyceride"),
        // Sweeteners
        HeuristicRule::substring("sweetener", "aspartame"),
        HeuristicRule::substring("sweetener", "sucralose"),
        HeuristicRule::substring("sweetener", "saccharin"),
        HeuristicRule::substring("sweetener", "stevia"),
        HeuristicRule::substring("sweetener", "xylitol"),
        HeuristicRule::substring("sweetener", "sorbitol"),
        // MSG and flavor enhancers
        HeuristicRule::substring("flavor enhancer", "glutamate"),
        HeuristicRule::substring("flavor enhancer", "inosinate"),
        HeuristicRule::substring("flavor enhancer", "guanylate"),
    ]
});

/// First heuristic rule family matching the normalized key, if any
pub fn heuristic_family(key: &str) -> Option<&'static str> {
    HEURISTIC_RULES
        .iter()
        .find(|rule| rule.matches(key))
        .map(|rule| rule.family)
}

/// Classifies raw ingredient tokens against the catalog plus the
/// heuristic rule library
#[derive(Clone)]
pub struct IngredientMatcher {
    db: SqlitePool,
}

impl IngredientMatcher {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Flag watchlisted ingredients in a product's ingredient text.
    ///
    /// Empty or whitespace-only input yields an empty list. Unknown
    /// tokens are the normal non-error outcome and produce no flag.
    /// Database errors propagate: the catalog being unreachable is a
    /// service failure, not an empty watchlist.
    pub async fn classify(&self, ingredients_text: &str) -> Result<Vec<IngredientFlag>> {
        if ingredients_text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let active = catalog::active_names(&self.db).await?;
        let mut flags = Vec::new();

        for token in ingredients_text.split(',') {
            let text = token.trim();
            if text.is_empty() {
                continue;
            }
            let key = normalize_key(text);

            // Exact catalog match takes precedence over any heuristic
            if active.contains(&key) {
                if let Some(record) = catalog::find_by_name_or_alias(&self.db, &key).await? {
                    let category = catalog::find_category(&self.db, record.category_id).await?;
                    let category_name = category
                        .map(|c| c.name)
                        .unwrap_or_else(|| "Unknown".to_string());
                    let has_summary = record.has_research_summary();
                    flags.push(IngredientFlag::matched(
                        text,
                        key,
                        category_name,
                        record.severity,
                        record.health_concerns,
                        has_summary,
                    ));
                    continue;
                }
            }

            if let Some(family) = heuristic_family(&key) {
                debug!(ingredient = %key, family, "Heuristic flag");
                flags.push(IngredientFlag::heuristic(text, key));
            }
        }

        Ok(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::catalog::{save_category, save_ingredient};
    use crate::models::{Category, IngredientRecord, Severity};
    use verdia_common::db::init_memory_database;

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_key(" Aspartame "), "aspartame");
        assert_eq!(normalize_key("POTASSIUM SORBATE"), "potassium sorbate");
        assert_eq!(normalize_key("  "), "");
    }

    #[test]
    fn heuristic_families() {
        assert_eq!(heuristic_family("potassium sorbate"), Some("chemical suffix"));
        assert_eq!(heuristic_family("sodium nitrite"), Some("preservative"));
        assert_eq!(heuristic_family("red 40"), Some("numbered dye"));
        assert_eq!(heuristic_family("yellow5"), Some("numbered dye"));
        assert_eq!(heuristic_family("xanthan gum"), Some("emulsifier"));
        assert_eq!(heuristic_family("sucralose"), Some("sweetener"));
        assert_eq!(heuristic_family("disodium inosinate"), Some("chemical suffix"));
        assert_eq!(heuristic_family("water"), None);
        assert_eq!(heuristic_family("sugar"), None);
        assert_eq!(heuristic_family("salt"), None);
    }

    async fn seeded_matcher() -> (IngredientMatcher, SqlitePool) {
        let pool = init_memory_database().await.unwrap();

        let category = Category::new(
            "Artificial Sweeteners".to_string(),
            String::new(),
            Severity::Moderate,
        );
        save_category(&pool, &category).await.unwrap();

        let mut aspartame = IngredientRecord::new(
            "aspartame",
            vec!["e951".to_string()],
            category.id,
            Severity::High,
            vec!["headaches".to_string()],
        );
        aspartame.research_summary = Some("Research suggests...".to_string());
        save_ingredient(&pool, &aspartame).await.unwrap();

        let preservatives = Category::new("Preservatives".to_string(), String::new(), Severity::Moderate);
        save_category(&pool, &preservatives).await.unwrap();
        let sorbate = IngredientRecord::new(
            "potassium sorbate",
            vec![],
            preservatives.id,
            Severity::Low,
            vec![],
        );
        save_ingredient(&pool, &sorbate).await.unwrap();

        (IngredientMatcher::new(pool.clone()), pool)
    }

    #[tokio::test]
    async fn empty_input_yields_no_flags() {
        let (matcher, _pool) = seeded_matcher().await;
        assert!(matcher.classify("").await.unwrap().is_empty());
        assert!(matcher.classify("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn catalog_match_carries_record_data() {
        let (matcher, _pool) = seeded_matcher().await;
        let flags = matcher.classify("water, aspartame, sugar").await.unwrap();

        assert_eq!(flags.len(), 1);
        let flag = &flags[0];
        assert!(flag.matched);
        assert!(!flag.heuristic);
        assert_eq!(flag.normalized_key, "aspartame");
        assert_eq!(flag.category, "Artificial Sweeteners");
        assert_eq!(flag.severity, Severity::High);
        assert_eq!(flag.health_concerns, vec!["headaches".to_string()]);
        assert!(flag.has_research_summary);
    }

    #[tokio::test]
    async fn classification_is_case_and_whitespace_insensitive() {
        let (matcher, _pool) = seeded_matcher().await;

        let upper = matcher.classify(" Aspartame , Water ").await.unwrap();
        let lower = matcher.classify("aspartame,water").await.unwrap();

        assert_eq!(upper.len(), 1);
        assert_eq!(lower.len(), 1);
        assert_eq!(upper[0].normalized_key, lower[0].normalized_key);
        assert_eq!(upper[0].category, lower[0].category);
        assert_eq!(upper[0].severity, lower[0].severity);
    }

    #[tokio::test]
    async fn alias_matches_like_primary_name() {
        let (matcher, _pool) = seeded_matcher().await;
        let flags = matcher.classify("E951").await.unwrap();

        assert_eq!(flags.len(), 1);
        assert!(flags[0].matched);
        assert_eq!(flags[0].category, "Artificial Sweeteners");
    }

    #[tokio::test]
    async fn exact_match_beats_heuristic() {
        // "potassium sorbate" satisfies both the catalog and the suffix
        // rules; the catalog must win
        let (matcher, _pool) = seeded_matcher().await;
        let flags = matcher.classify("potassium sorbate").await.unwrap();

        assert_eq!(flags.len(), 1);
        let flag = &flags[0];
        assert!(flag.matched);
        assert!(!flag.heuristic);
        assert_eq!(flag.category, "Preservatives");
        assert_eq!(flag.severity, Severity::Low);
    }

    #[tokio::test]
    async fn unknown_suspicious_token_gets_heuristic_flag() {
        let (matcher, _pool) = seeded_matcher().await;
        let flags = matcher.classify("sodium benzoate, water").await.unwrap();

        assert_eq!(flags.len(), 1);
        let flag = &flags[0];
        assert!(flag.heuristic);
        assert!(!flag.matched);
        assert_eq!(flag.category, "Auto-Flagged");
        assert_eq!(flag.severity, Severity::Moderate);
        assert!(flag.health_concerns.is_empty());
        assert!(!flag.has_research_summary);
    }

    #[tokio::test]
    async fn benign_tokens_are_not_flagged() {
        let (matcher, _pool) = seeded_matcher().await;
        let flags = matcher.classify("water, sugar, salt, flour").await.unwrap();
        assert!(flags.is_empty());
    }
}
