//! Payout API handlers

use axum::extract::{Extension, State};
use axum::Json;
use validator::Validate;

use shared::models::TeamMember;
use shared::{AppError, AppResult};

use crate::api::auth::{CurrentUser, require_admin};
use crate::core::ServerState;

#[derive(serde::Deserialize, Validate)]
pub struct PayoutRequest {
    pub member_id: String,
    #[validate(range(min = 0.01))]
    pub amount: f64,
    /// Link to the transfer receipt
    #[validate(url)]
    pub proof_url: String,
}

/// POST /api/payouts - admin settles a member's accumulated commission
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PayoutRequest>,
) -> AppResult<Json<TeamMember>> {
    require_admin(&user)?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let member = state
        .payouts
        .process_payout(
            &user.id,
            &payload.member_id,
            payload.amount,
            &payload.proof_url,
        )
        .await?;
    Ok(Json(member))
}
