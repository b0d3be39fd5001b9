//! HTTP handlers for the sock inventory
//!
//! Handlers only extract the request and shape the response; every rule lives
//! in [`InventoryService`]. Errors are returned as [`InventoryError`], whose
//! `IntoResponse` picks the status code.

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use serde::Serialize;
use std::sync::Arc;

use crate::core::error::{InventoryError, InventoryResult};
use crate::core::query::SockQuery;
use crate::core::sock::{Sock, SockPayload};
use crate::inventory::extract::{JsonBody, QueryParams};
use crate::inventory::import::ImportSummary;
use crate::inventory::service::InventoryService;

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "file";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InventoryService>,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Response for the batch upload endpoint
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub message: String,
    #[serde(flatten)]
    pub summary: ImportSummary,
}

/// List socks, filtered and sorted by the query string
///
/// GET /api/socks
pub async fn list_socks(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<SockQuery>,
) -> InventoryResult<Json<Vec<Sock>>> {
    let socks = state.service.list_socks(&query).await?;
    Ok(Json(socks))
}

/// Replace one record by id
///
/// PUT /api/socks/{id}
pub async fn update_sock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<SockPayload>,
) -> InventoryResult<Json<Sock>> {
    let sock = state.service.replace_sock(id, &payload).await?;
    Ok(Json(sock))
}

/// POST /api/socks/income
pub async fn register_income(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SockPayload>,
) -> InventoryResult<Json<MessageResponse>> {
    state.service.add_socks(&payload).await?;
    Ok(MessageResponse::new("Income processed successfully."))
}

/// POST /api/socks/outcome
pub async fn register_outcome(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SockPayload>,
) -> InventoryResult<Json<MessageResponse>> {
    state.service.remove_socks(&payload).await?;
    Ok(MessageResponse::new("Socks quantity decreased successfully."))
}

/// Bulk import from a CSV or Excel upload
///
/// POST /api/socks/batch (multipart, field `file`)
pub async fn import_batch(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> InventoryResult<Json<ImportResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| InventoryError::file_processing(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| InventoryError::file_processing(format!("failed to read upload: {}", e)))?;

        let summary = state.service.import_file(&file_name, &bytes).await?;
        return Ok(Json(ImportResponse {
            message: "Batch processed successfully.".to_string(),
            summary,
        }));
    }

    Err(InventoryError::file_processing(format!(
        "multipart field '{}' is missing",
        UPLOAD_FIELD
    )))
}
