//! Settings API handlers

use axum::extract::{Extension, State};
use axum::Json;

use shared::models::{GlobalSettings, SettingsUpdate};
use shared::AppResult;

use crate::api::auth::{CurrentUser, require_admin};
use crate::core::ServerState;
use crate::services::MarkupSuggestion;

/// GET /api/settings
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<GlobalSettings>> {
    Ok(Json(state.settings.get().await?))
}

/// PUT /api/settings - admin, audited as SETTINGS_UPDATE
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<SettingsUpdate>,
) -> AppResult<Json<GlobalSettings>> {
    require_admin(&user)?;
    Ok(Json(state.settings.update(&user.id, payload).await?))
}

/// GET /api/settings/markup-suggestion - admin asks the advisor for a
/// markup correction based on current inflation
pub async fn markup_suggestion(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<MarkupSuggestion>> {
    require_admin(&user)?;
    let settings = state.settings.get().await?;
    let suggestion = state.markup.suggest(settings.markup_percentage).await?;
    Ok(Json(suggestion))
}
