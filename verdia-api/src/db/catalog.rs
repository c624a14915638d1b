//! Ingredient catalog database operations
//!
//! Names and aliases are stored lowercase, so lookups by normalized key
//! are direct string comparisons.

use sqlx::{Row, SqlitePool};
use std::collections::HashSet;
use uuid::Uuid;
use verdia_common::{Error, Result};

use crate::models::{Category, IngredientRecord, Severity};

/// Save a category (insert or update by id)
pub async fn save_category(pool: &SqlitePool, category: &Category) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO ingredient_categories (
            id, name, description, severity, active, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            description = excluded.description,
            severity = excluded.severity,
            active = excluded.active,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(category.id.to_string())
    .bind(&category.name)
    .bind(&category.description)
    .bind(category.severity.as_str())
    .bind(category.active as i64)
    .bind(category.created_at.to_rfc3339())
    .bind(category.updated_at.to_rfc3339())
    .execute(pool)
    .await?;
    Ok(())
}

/// Load a category by id
pub async fn find_category(pool: &SqlitePool, id: Uuid) -> Result<Option<Category>> {
    let row = sqlx::query(
        "SELECT id, name, description, severity, active, created_at, updated_at
         FROM ingredient_categories WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(category_from_row).transpose()
}

/// Load a category by name (case-insensitive)
pub async fn find_category_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Category>> {
    let row = sqlx::query(
        "SELECT id, name, description, severity, active, created_at, updated_at
         FROM ingredient_categories WHERE name = ? COLLATE NOCASE",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    row.map(category_from_row).transpose()
}

/// List categories, optionally including inactive ones
pub async fn list_categories(pool: &SqlitePool, active_only: bool) -> Result<Vec<Category>> {
    let sql = if active_only {
        "SELECT id, name, description, severity, active, created_at, updated_at
         FROM ingredient_categories WHERE active = 1 ORDER BY name"
    } else {
        "SELECT id, name, description, severity, active, created_at, updated_at
         FROM ingredient_categories ORDER BY name"
    };

    let rows = sqlx::query(sql).fetch_all(pool).await?;
    rows.into_iter().map(category_from_row).collect()
}

/// Save an ingredient record (insert or update by id)
pub async fn save_ingredient(pool: &SqlitePool, record: &IngredientRecord) -> Result<()> {
    let aliases = serde_json::to_string(&record.aliases)
        .map_err(|e| Error::Internal(format!("Failed to serialize aliases: {}", e)))?;
    let health_concerns = serde_json::to_string(&record.health_concerns)
        .map_err(|e| Error::Internal(format!("Failed to serialize health concerns: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO ingredients (
            id, name, aliases, category_id, severity,
            health_concerns, research_summary, active, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            aliases = excluded.aliases,
            category_id = excluded.category_id,
            severity = excluded.severity,
            health_concerns = excluded.health_concerns,
            research_summary = excluded.research_summary,
            active = excluded.active,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(record.id.to_string())
    .bind(&record.name)
    .bind(&aliases)
    .bind(record.category_id.to_string())
    .bind(record.severity.as_str())
    .bind(&health_concerns)
    .bind(&record.research_summary)
    .bind(record.active as i64)
    .bind(record.created_at.to_rfc3339())
    .bind(record.updated_at.to_rfc3339())
    .execute(pool)
    .await?;
    Ok(())
}

/// List ingredient records, optionally including inactive ones
pub async fn list_ingredients(pool: &SqlitePool, active_only: bool) -> Result<Vec<IngredientRecord>> {
    let sql = if active_only {
        "SELECT id, name, aliases, category_id, severity, health_concerns,
                research_summary, active, created_at, updated_at
         FROM ingredients WHERE active = 1 ORDER BY name"
    } else {
        "SELECT id, name, aliases, category_id, severity, health_concerns,
                research_summary, active, created_at, updated_at
         FROM ingredients ORDER BY name"
    };

    let rows = sqlx::query(sql).fetch_all(pool).await?;
    rows.into_iter().map(ingredient_from_row).collect()
}

/// Find an active ingredient by exact name, then by alias.
///
/// `key` must already be normalized (lowercase, trimmed). The alias lookup
/// scans active records because aliases are a JSON column.
pub async fn find_by_name_or_alias(pool: &SqlitePool, key: &str) -> Result<Option<IngredientRecord>> {
    let row = sqlx::query(
        "SELECT id, name, aliases, category_id, severity, health_concerns,
                research_summary, active, created_at, updated_at
         FROM ingredients WHERE name = ? AND active = 1",
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    if let Some(row) = row {
        return Ok(Some(ingredient_from_row(row)?));
    }

    for record in list_ingredients(pool, true).await? {
        if record.aliases.iter().any(|a| a == key) {
            return Ok(Some(record));
        }
    }

    Ok(None)
}

/// All active ingredient names and aliases, lowercased, for fast scanning
pub async fn active_names(pool: &SqlitePool) -> Result<HashSet<String>> {
    let mut names = HashSet::new();
    for record in list_ingredients(pool, true).await? {
        names.insert(record.name);
        names.extend(record.aliases);
    }
    tracing::debug!(count = names.len(), "Loaded ingredient names for scanning");
    Ok(names)
}

/// Backfill a generated research summary onto a record that has none.
///
/// Returns true if the record was updated. Records with an existing
/// summary are left alone: curated text wins over generated text.
pub async fn set_research_summary_if_missing(
    pool: &SqlitePool,
    id: Uuid,
    summary: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE ingredients
        SET research_summary = ?, updated_at = ?
        WHERE id = ? AND (research_summary IS NULL OR TRIM(research_summary) = '')
        "#,
    )
    .bind(summary)
    .bind(chrono::Utc::now().to_rfc3339())
    .bind(id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

fn parse_uuid(s: &str, field: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| Error::Internal(format!("Failed to parse {}: {}", field, e)))
}

fn parse_timestamp(s: &str, field: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| Error::Internal(format!("Failed to parse {}: {}", field, e)))
        .map(|dt| dt.with_timezone(&chrono::Utc))
}

fn parse_severity(s: &str) -> Result<Severity> {
    Severity::parse(s).ok_or_else(|| Error::Internal(format!("Unknown severity: {}", s)))
}

fn category_from_row(row: sqlx::sqlite::SqliteRow) -> Result<Category> {
    let id: String = row.get("id");
    let severity: String = row.get("severity");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Category {
        id: parse_uuid(&id, "category id")?,
        name: row.get("name"),
        description: row.get("description"),
        severity: parse_severity(&severity)?,
        active: row.get::<i64, _>("active") != 0,
        created_at: parse_timestamp(&created_at, "created_at")?,
        updated_at: parse_timestamp(&updated_at, "updated_at")?,
    })
}

fn ingredient_from_row(row: sqlx::sqlite::SqliteRow) -> Result<IngredientRecord> {
    let id: String = row.get("id");
    let category_id: String = row.get("category_id");
    let severity: String = row.get("severity");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    let aliases: String = row.get("aliases");
    let aliases: Vec<String> = serde_json::from_str(&aliases)
        .map_err(|e| Error::Internal(format!("Failed to deserialize aliases: {}", e)))?;

    let health_concerns: String = row.get("health_concerns");
    let health_concerns: Vec<String> = serde_json::from_str(&health_concerns)
        .map_err(|e| Error::Internal(format!("Failed to deserialize health concerns: {}", e)))?;

    Ok(IngredientRecord {
        id: parse_uuid(&id, "ingredient id")?,
        name: row.get("name"),
        aliases,
        category_id: parse_uuid(&category_id, "category_id")?,
        severity: parse_severity(&severity)?,
        health_concerns,
        research_summary: row.get("research_summary"),
        active: row.get::<i64, _>("active") != 0,
        created_at: parse_timestamp(&created_at, "created_at")?,
        updated_at: parse_timestamp(&updated_at, "updated_at")?,
    })
}
