//! Route tables for the inventory API

use crate::inventory::handlers::{
    AppState, import_batch, list_socks, register_income, register_outcome, update_sock,
};
use axum::{
    Json, Router,
    routing::{get, post, put},
};
use serde_json::{Value, json};

/// Name reported by the health endpoints
pub const SERVICE_NAME: &str = "socks-inventory";

/// Build the inventory routes
///
/// - GET /api/socks - List socks, filtered and sorted by the query string
/// - PUT /api/socks/{id} - Replace one record
/// - POST /api/socks/income - Add stock
/// - POST /api/socks/outcome - Remove stock
/// - POST /api/socks/batch - Bulk import from a CSV or Excel upload
pub fn build_inventory_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/socks", get(list_socks))
        .route("/api/socks/{id}", put(update_sock))
        .route("/api/socks/income", post(register_income))
        .route("/api/socks/outcome", post(register_outcome))
        .route("/api/socks/batch", post(import_batch))
        .with_state(state)
}

/// Build health check routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME
    }))
}
