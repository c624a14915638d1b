//! Cached research summaries, keyed by normalized ingredient name
//!
//! This is the durable half of the brief cache: completed summaries land
//! here and are served on every later request without touching the
//! research provider. Database errors propagate; an unreachable store is
//! not a cache miss.

use sqlx::SqlitePool;
use verdia_common::Result;

/// Fetch the cached summary for a key, if one has been generated
pub async fn get_summary(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let summary: Option<String> =
        sqlx::query_scalar("SELECT summary FROM ingredient_summaries WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;
    Ok(summary)
}

/// Store a generated summary. An existing entry is overwritten; this is
/// only reached by explicit regeneration, since completed keys
/// short-circuit at the cache check.
pub async fn store_summary(pool: &SqlitePool, key: &str, summary: &str) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    sqlx::query(
        r#"
        INSERT INTO ingredient_summaries (key, summary, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET
            summary = excluded.summary,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(summary)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdia_common::db::init_memory_database;

    #[tokio::test]
    async fn missing_key_is_none() {
        let pool = init_memory_database().await.unwrap();
        assert_eq!(get_summary(&pool, "aspartame").await.unwrap(), None);
    }

    #[tokio::test]
    async fn store_then_get() {
        let pool = init_memory_database().await.unwrap();
        store_summary(&pool, "aspartame", "Research suggests...")
            .await
            .unwrap();

        assert_eq!(
            get_summary(&pool, "aspartame").await.unwrap().as_deref(),
            Some("Research suggests...")
        );
    }

    #[tokio::test]
    async fn store_overwrites_existing() {
        let pool = init_memory_database().await.unwrap();
        store_summary(&pool, "aspartame", "old").await.unwrap();
        store_summary(&pool, "aspartame", "new").await.unwrap();

        assert_eq!(
            get_summary(&pool, "aspartame").await.unwrap().as_deref(),
            Some("new")
        );
    }
}
