//! Admin Order API 模块 (订单管理)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::api::auth;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}/status", put(handler::update_status))
        .layer(middleware::from_fn(auth::require_admin))
}
