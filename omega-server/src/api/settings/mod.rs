//! Settings API module

mod handler;

use axum::routing::get;
use axum::Router;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/settings", get(handler::get).put(handler::update))
        .route(
            "/api/settings/markup-suggestion",
            get(handler::markup_suggestion),
        )
}
