//! Product catalog API module

mod handler;

use axum::routing::get;
use axum::Router;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/products", get(handler::list).post(handler::upsert))
        .route("/api/products/{id}", get(handler::get_by_id))
}
