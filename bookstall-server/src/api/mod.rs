//! HTTP API
//!
//! Route composition. Everything except `/health` sits behind
//! [`auth::require_user`]; the admin surface additionally requires the
//! admin role.

pub mod admin;
pub mod auth;
pub mod health;
pub mod orders;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Create the combined router
pub fn create_router(state: ServerState) -> Router {
    let protected = Router::new()
        .merge(orders::router())
        .merge(admin::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_user,
        ));

    Router::new()
        .merge(health::router())
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
