//! Image upload API handlers
//!
//! Forwards to the configured image host; the ledger only ever sees URLs.

use axum::extract::State;
use axum::Json;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use shared::{AppError, AppResult};

use crate::core::ServerState;

#[derive(serde::Deserialize)]
pub struct UploadRequest {
    pub filename: String,
    /// Base64-encoded file content
    pub data: String,
}

#[derive(serde::Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// POST /api/uploads
pub async fn upload(
    State(state): State<ServerState>,
    Json(payload): Json<UploadRequest>,
) -> AppResult<Json<UploadResponse>> {
    let bytes = BASE64
        .decode(&payload.data)
        .map_err(|e| AppError::validation(format!("invalid base64 payload: {e}")))?;
    let url = state.images.upload(&bytes, &payload.filename).await?;
    Ok(Json(UploadResponse { url }))
}
