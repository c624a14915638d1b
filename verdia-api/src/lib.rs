//! verdia-api library interface
//!
//! Exposes the application state, router construction, and the domain
//! modules for integration testing.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod matcher;
pub mod models;
pub mod research;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use matcher::IngredientMatcher;
use research::{BriefCoordinator, EvidenceSource};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (catalog, summaries, products)
    pub db: SqlitePool,
    /// Ingredient classifier
    pub matcher: IngredientMatcher,
    /// Brief generation coordinator
    pub briefs: BriefCoordinator,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, source: Arc<dyn EvidenceSource>, provider_timeout: Duration) -> Self {
        Self {
            matcher: IngredientMatcher::new(db.clone()),
            briefs: BriefCoordinator::new(db.clone(), source, provider_timeout),
            db,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// CORS is wide open: the browser and mobile frontends talk to this
/// service directly.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::scan_routes())
        .merge(api::brief_routes())
        .merge(api::admin_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
