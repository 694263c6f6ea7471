//! Member API module

mod handler;

use axum::routing::{get, post};
use axum::Router;

use crate::core::ServerState;

/// Routes that work without an identity (self-service registration)
pub fn public_router() -> Router<ServerState> {
    Router::new().route("/api/members", post(handler::register))
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/members", get(handler::list))
        .route(
            "/api/members/{id}",
            get(handler::get_by_id).put(handler::update),
        )
        .route(
            "/api/members/{id}/activation-proof",
            post(handler::submit_proof),
        )
        .route("/api/members/{id}/approval", post(handler::approve))
}
