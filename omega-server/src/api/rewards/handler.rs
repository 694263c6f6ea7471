//! Reward and coupon API handlers

use axum::extract::{Extension, State};
use axum::Json;

use shared::models::{Coupon, Reward};
use shared::{AppError, AppResult};

use crate::api::auth::CurrentUser;
use crate::core::ServerState;
use crate::rewards::default_catalog;

/// GET /api/rewards - the redeemable catalog
pub async fn catalog() -> Json<Vec<Reward>> {
    Json(default_catalog())
}

#[derive(serde::Deserialize)]
pub struct RedeemRequest {
    pub reward_id: String,
}

#[derive(serde::Serialize)]
pub struct RedemptionResponse {
    pub coupon: Coupon,
    pub remaining_points: i64,
}

/// POST /api/rewards/redeem - spend points, mint a coupon
pub async fn redeem(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<RedeemRequest>,
) -> AppResult<Json<RedemptionResponse>> {
    let reward = default_catalog()
        .into_iter()
        .find(|r| r.id == payload.reward_id)
        .ok_or_else(|| AppError::not_found(format!("Reward {}", payload.reward_id)))?;

    let redemption = state.rewards.redeem(&user.id, &reward).await?;
    Ok(Json(RedemptionResponse {
        coupon: redemption.coupon,
        remaining_points: redemption.remaining_points,
    }))
}

/// GET /api/coupons - own coupons; admin sees all
pub async fn list_coupons(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Coupon>>> {
    let mut coupons: Vec<Coupon> = state.ledger.list().await?;
    if !user.role.is_admin() {
        coupons.retain(|c| c.member_id == user.id);
    }
    coupons.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(coupons))
}
