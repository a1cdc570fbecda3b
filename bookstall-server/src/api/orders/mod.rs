//! Order API 模块 (买家/卖家订单)
//!
//! Checkout, payment verification and order views for the authenticated
//! buyer or seller. Admin status updates live under `/api/admin/orders`.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/verify-payment", post(handler::verify_payment))
        .route("/my-orders", get(handler::my_orders))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/return", put(handler::request_return))
}
