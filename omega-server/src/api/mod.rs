//! HTTP API
//!
//! One router module per resource. Identity comes from the `X-Member-Id`
//! header resolved by the [`auth::identify`] middleware; role checks and
//! order visibility are enforced here, on the read side; storage never
//! filters for access control.

pub mod audit_log;
pub mod auth;
pub mod health;
pub mod members;
pub mod orders;
pub mod payouts;
pub mod products;
pub mod rewards;
pub mod settings;
pub mod uploads;

use axum::Router;
use axum::middleware;

use crate::core::ServerState;

pub fn router(state: ServerState) -> Router {
    let public = Router::new()
        .merge(health::router())
        .merge(members::public_router());

    let protected = Router::new()
        .merge(members::router())
        .merge(orders::router())
        .merge(payouts::router())
        .merge(products::router())
        .merge(rewards::router())
        .merge(settings::router())
        .merge(audit_log::router())
        .merge(uploads::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::identify,
        ));

    public.merge(protected).with_state(state)
}
