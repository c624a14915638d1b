//! Product catalog database operations

use sqlx::{Row, SqlitePool};
use verdia_common::Result;

use crate::models::Product;

/// Look up a product by barcode
pub async fn find_product(pool: &SqlitePool, barcode: &str) -> Result<Option<Product>> {
    let row = sqlx::query(
        "SELECT barcode, name, brand, packaging_recyclable, packaging_material,
                ingredients_text, image_url
         FROM products WHERE barcode = ?",
    )
    .bind(barcode)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| Product {
        barcode: row.get("barcode"),
        name: row.get("name"),
        brand: row.get("brand"),
        packaging_recyclable: row.get::<i64, _>("packaging_recyclable") != 0,
        packaging_material: row.get("packaging_material"),
        ingredients_text: row.get("ingredients_text"),
        image_url: row.get("image_url"),
    }))
}

/// Save a product (insert or update by barcode)
pub async fn save_product(pool: &SqlitePool, product: &Product) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO products (
            barcode, name, brand, packaging_recyclable, packaging_material,
            ingredients_text, image_url
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(barcode) DO UPDATE SET
            name = excluded.name,
            brand = excluded.brand,
            packaging_recyclable = excluded.packaging_recyclable,
            packaging_material = excluded.packaging_material,
            ingredients_text = excluded.ingredients_text,
            image_url = excluded.image_url
        "#,
    )
    .bind(&product.barcode)
    .bind(&product.name)
    .bind(&product.brand)
    .bind(product.packaging_recyclable as i64)
    .bind(&product.packaging_material)
    .bind(&product.ingredients_text)
    .bind(&product.image_url)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdia_common::db::init_memory_database;

    fn sample_product() -> Product {
        Product {
            barcode: "0123456789012".to_string(),
            name: "Diet Cola".to_string(),
            brand: Some("Fizzco".to_string()),
            packaging_recyclable: true,
            packaging_material: Some("aluminum".to_string()),
            ingredients_text: Some("carbonated water, aspartame, caramel color".to_string()),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn product_roundtrip() {
        let pool = init_memory_database().await.unwrap();
        save_product(&pool, &sample_product()).await.unwrap();

        let loaded = find_product(&pool, "0123456789012").await.unwrap().unwrap();
        assert_eq!(loaded.name, "Diet Cola");
        assert!(loaded.packaging_recyclable);
        assert_eq!(loaded.brand.as_deref(), Some("Fizzco"));
    }

    #[tokio::test]
    async fn unknown_barcode_is_none() {
        let pool = init_memory_database().await.unwrap();
        assert!(find_product(&pool, "404").await.unwrap().is_none());
    }
}
