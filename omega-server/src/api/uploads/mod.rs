//! Image upload API module

mod handler;

use axum::routing::post;
use axum::Router;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/uploads", post(handler::upload))
}
