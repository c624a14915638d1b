//! Admin API handlers: watchlist curation
//!
//! Categories and ingredients are managed here; the scan path treats the
//! catalog as read-only. The watchlist import endpoint ingests the
//! legacy category-name → ingredient-list JSON format in one call.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    db::{catalog, products},
    error::{ApiError, ApiResult},
    models::{Category, IngredientRecord, Product, Severity},
    AppState,
};

/// Listing filter shared by the category and ingredient list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// POST /admin/categories request
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
}

/// POST /admin/ingredients request
#[derive(Debug, Deserialize)]
pub struct CreateIngredientRequest {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub category_id: Uuid,
    pub severity: Option<Severity>,
    #[serde(default)]
    pub health_concerns: Vec<String>,
}

/// POST /admin/watchlist/import response
#[derive(Debug, Serialize)]
pub struct WatchlistImportResponse {
    pub categories_created: usize,
    pub ingredients_created: usize,
}

/// GET /admin/categories
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Category>>> {
    let categories = catalog::list_categories(&state.db, !query.include_inactive).await?;
    Ok(Json(categories))
}

/// POST /admin/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> ApiResult<Json<Category>> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Category name must not be empty".to_string()));
    }
    if catalog::find_category_by_name(&state.db, name).await?.is_some() {
        return Err(ApiError::BadRequest(format!(
            "Category '{}' already exists",
            name
        )));
    }

    let category = Category::new(name.to_string(), request.description, request.severity);
    catalog::save_category(&state.db, &category).await?;

    tracing::info!(category = %category.name, "Created category");
    Ok(Json(category))
}

/// GET /admin/ingredients
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<IngredientRecord>>> {
    let ingredients = catalog::list_ingredients(&state.db, !query.include_inactive).await?;
    Ok(Json(ingredients))
}

/// POST /admin/ingredients
///
/// The ingredient's severity defaults to its category's severity when not
/// given explicitly.
pub async fn create_ingredient(
    State(state): State<AppState>,
    Json(request): Json<CreateIngredientRequest>,
) -> ApiResult<Json<IngredientRecord>> {
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Ingredient name must not be empty".to_string()));
    }

    let category = catalog::find_category(&state.db, request.category_id)
        .await?
        .ok_or_else(|| {
            ApiError::BadRequest(format!("Unknown category: {}", request.category_id))
        })?;

    let record = IngredientRecord::new(
        &request.name,
        request.aliases,
        category.id,
        request.severity.unwrap_or(category.severity),
        request.health_concerns,
    );

    if catalog::find_by_name_or_alias(&state.db, &record.name).await?.is_some() {
        return Err(ApiError::BadRequest(format!(
            "Ingredient '{}' already exists",
            record.name
        )));
    }

    catalog::save_ingredient(&state.db, &record).await?;

    tracing::info!(ingredient = %record.name, "Created ingredient");
    Ok(Json(record))
}

/// POST /admin/watchlist/import
///
/// Import the legacy watchlist format: a JSON object mapping category
/// names to ingredient name lists. Existing categories are reused and
/// existing ingredients skipped, so re-importing is safe.
pub async fn import_watchlist(
    State(state): State<AppState>,
    Json(watchlist): Json<HashMap<String, Vec<String>>>,
) -> ApiResult<Json<WatchlistImportResponse>> {
    let mut categories_created = 0;
    let mut ingredients_created = 0;

    for (category_name, ingredient_names) in watchlist {
        let category = match catalog::find_category_by_name(&state.db, &category_name).await? {
            Some(existing) => existing,
            None => {
                let category = Category::new(
                    category_name.clone(),
                    format!("Imported from watchlist: {}", category_name),
                    default_severity_for_category(&category_name),
                );
                catalog::save_category(&state.db, &category).await?;
                categories_created += 1;
                category
            }
        };

        for name in ingredient_names {
            let key = name.trim().to_lowercase();
            if key.is_empty() || catalog::find_by_name_or_alias(&state.db, &key).await?.is_some() {
                continue;
            }

            let record = IngredientRecord::new(
                &name,
                vec![name.clone()],
                category.id,
                category.severity,
                Vec::new(),
            );
            catalog::save_ingredient(&state.db, &record).await?;
            ingredients_created += 1;
        }
    }

    tracing::info!(categories_created, ingredients_created, "Watchlist imported");
    Ok(Json(WatchlistImportResponse {
        categories_created,
        ingredients_created,
    }))
}

/// POST /admin/products
///
/// Create or update a product record.
pub async fn upsert_product(
    State(state): State<AppState>,
    Json(product): Json<Product>,
) -> ApiResult<Json<Product>> {
    if product.barcode.trim().is_empty() {
        return Err(ApiError::BadRequest("Barcode must not be empty".to_string()));
    }

    products::save_product(&state.db, &product).await?;
    tracing::info!(barcode = %product.barcode, "Product saved");
    Ok(Json(product))
}

/// Default severity for well-known watchlist category names
fn default_severity_for_category(category_name: &str) -> Severity {
    match category_name.to_lowercase().as_str() {
        "artificial sweeteners" => Severity::Moderate,
        "preservatives" => Severity::Moderate,
        "food dyes" => Severity::Moderate,
        "emulsifiers and thickeners" => Severity::Low,
        "flavor enhancers" => Severity::Low,
        "stimulants" => Severity::Moderate,
        "controversial or emerging" => Severity::High,
        "sugar alcohols" => Severity::Low,
        _ => Severity::Moderate,
    }
}

/// Build admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/categories", get(list_categories).post(create_category))
        .route("/admin/ingredients", get(list_ingredients).post(create_ingredient))
        .route("/admin/watchlist/import", post(import_watchlist))
        .route("/admin/products", post(upsert_product))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_category_severities() {
        assert_eq!(
            default_severity_for_category("Controversial or Emerging"),
            Severity::High
        );
        assert_eq!(
            default_severity_for_category("sugar alcohols"),
            Severity::Low
        );
        assert_eq!(
            default_severity_for_category("something new"),
            Severity::Moderate
        );
    }
}
