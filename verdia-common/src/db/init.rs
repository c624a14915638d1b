//! Database initialization
//!
//! Creates the SQLite database on first run and brings the schema up to
//! date. All table creation is idempotent, so startup can run it
//! unconditionally.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    // WAL allows concurrent readers while a brief generation task writes
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Initialize an in-memory database for tests.
///
/// A single connection is required: every new `:memory:` connection gets
/// its own empty database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent - safe to call multiple times)
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    create_categories_table(pool).await?;
    create_ingredients_table(pool).await?;
    create_summaries_table(pool).await?;
    create_products_table(pool).await?;
    Ok(())
}

/// Ingredient categories (e.g. "Preservatives", "Artificial Sweeteners")
pub async fn create_categories_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ingredient_categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT '',
            severity TEXT NOT NULL DEFAULT 'moderate',
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Watchlisted ingredients. `aliases` and `health_concerns` are JSON
/// arrays stored as TEXT; `name` is stored lowercase.
pub async fn create_ingredients_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ingredients (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            aliases TEXT NOT NULL DEFAULT '[]',
            category_id TEXT NOT NULL REFERENCES ingredient_categories(id),
            severity TEXT NOT NULL DEFAULT 'moderate',
            health_concerns TEXT NOT NULL DEFAULT '[]',
            research_summary TEXT,
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Completed research briefs, keyed by normalized ingredient name.
/// Written once per key on successful generation; never auto-invalidated.
pub async fn create_summaries_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ingredient_summaries (
            key TEXT PRIMARY KEY,
            summary TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Product catalog, keyed by barcode
pub async fn create_products_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            barcode TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            brand TEXT,
            packaging_recyclable INTEGER NOT NULL DEFAULT 0,
            packaging_material TEXT,
            ingredients_text TEXT,
            image_url TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn table_exists(pool: &SqlitePool, name: &str) -> bool {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap();
        count == 1
    }

    #[tokio::test]
    async fn memory_database_has_all_tables() {
        let pool = init_memory_database().await.unwrap();

        assert!(table_exists(&pool, "ingredient_categories").await);
        assert!(table_exists(&pool, "ingredients").await);
        assert!(table_exists(&pool, "ingredient_summaries").await);
        assert!(table_exists(&pool, "products").await);
    }

    #[tokio::test]
    async fn create_tables_is_idempotent() {
        let pool = init_memory_database().await.unwrap();
        // Second run must not fail
        create_tables(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn init_database_creates_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("sub").join("verdia.db");

        let pool = init_database(&db_path).await.unwrap();
        assert!(db_path.exists());
        assert!(table_exists(&pool, "ingredients").await);
    }
}
