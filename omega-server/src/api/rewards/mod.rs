//! Reward and coupon API module

mod handler;

use axum::routing::{get, post};
use axum::Router;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/rewards", get(handler::catalog))
        .route("/api/rewards/redeem", post(handler::redeem))
        .route("/api/coupons", get(handler::list_coupons))
}
