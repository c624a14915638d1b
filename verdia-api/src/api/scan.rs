//! Product scan API handlers
//!
//! POST /scan looks up a product by barcode and flags watchlisted
//! ingredients in its ingredient text. GET /products/:barcode returns the
//! raw product record.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::products,
    error::{ApiError, ApiResult},
    models::{IngredientFlag, Product},
    AppState,
};

/// POST /scan request
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub barcode: String,
}

/// POST /scan response
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub product: Product,
    pub flagged_ingredients: Vec<IngredientFlag>,
}

/// POST /scan
///
/// Look up the scanned product and classify its ingredient text. A
/// product without ingredient text scans clean rather than failing.
pub async fn scan_product(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> ApiResult<Json<ScanResponse>> {
    let barcode = request.barcode.trim();
    if barcode.is_empty() {
        return Err(ApiError::BadRequest("Barcode must not be empty".to_string()));
    }

    let product = products::find_product(&state.db, barcode)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product with barcode '{}' not found", barcode)))?;

    let ingredients_text = product.ingredients_text.clone().unwrap_or_default();
    let flagged_ingredients = state.matcher.classify(&ingredients_text).await?;

    tracing::info!(
        barcode = %product.barcode,
        flagged = flagged_ingredients.len(),
        "Product scanned"
    );

    Ok(Json(ScanResponse {
        product,
        flagged_ingredients,
    }))
}

/// GET /products/:barcode
///
/// Retrieve product data by barcode.
pub async fn get_product(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> ApiResult<Json<Product>> {
    let product = products::find_product(&state.db, &barcode)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product with barcode '{}' not found", barcode)))?;

    Ok(Json(product))
}

/// Build scan routes
pub fn scan_routes() -> Router<AppState> {
    Router::new()
        .route("/scan", post(scan_product))
        .route("/products/:barcode", get(get_product))
}
