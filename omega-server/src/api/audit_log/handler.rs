//! Audit log API handlers

use axum::extract::{Extension, Query, State};
use axum::Json;

use shared::models::{AuditAction, AuditEntry};
use shared::AppResult;

use crate::api::auth::{CurrentUser, require_admin};
use crate::core::ServerState;

fn default_limit() -> usize {
    100
}

#[derive(serde::Deserialize)]
pub struct AuditLogQuery {
    pub action: Option<AuditAction>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// GET /api/audit-log?action=PAYOUT_PROCESSED - admin, newest first
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<AuditLogQuery>,
) -> AppResult<Json<Vec<AuditEntry>>> {
    require_admin(&user)?;
    let mut entries = state.audit.list(query.action).await?;
    entries.truncate(query.limit);
    Ok(Json(entries))
}
