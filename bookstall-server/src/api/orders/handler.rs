//! Order API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::ApiResponse;
use shared::models::Order;
use shared::request::{CheckoutRequest, ReturnOrderRequest, VerifyPaymentRequest};

use crate::api::auth::CurrentUser;
use crate::checkout::{self, CheckoutOutcome};
use crate::core::ServerState;
use crate::db::repository::order;
use crate::lifecycle;
use crate::payment;
use crate::utils::{AppError, AppResult, ok, ok_with_message};

/// Which side of an order the caller wants to see
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Side {
    #[default]
    Buyer,
    Seller,
}

/// Query params for my-orders
#[derive(Debug, Deserialize)]
pub struct MyOrdersQuery {
    #[serde(default)]
    role: Side,
}

/// Place an order for the current cart
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutOutcome>>> {
    let outcome = checkout::place_order(
        state.pool(),
        &state.config.payment_gateway_secret,
        &current_user,
        payload,
    )
    .await?;
    Ok(ok_with_message(outcome, "Order placed successfully"))
}

#[derive(Debug, Serialize)]
pub struct VerifyOutcome {
    verified: bool,
}

/// Standalone gateway signature check, used by clients before checkout
pub async fn verify_payment(
    State(state): State<ServerState>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> AppResult<Json<ApiResponse<VerifyOutcome>>> {
    let verified = payment::verify_signature(
        &state.config.payment_gateway_secret,
        &payload.gateway_order_id,
        &payload.gateway_payment_id,
        &payload.gateway_signature,
    );
    if !verified {
        return Err(AppError::business_rule("Payment verification failed"));
    }
    Ok(ok_with_message(
        VerifyOutcome { verified },
        "Payment verified successfully",
    ))
}

/// List the caller's orders, as buyer (default) or seller
pub async fn my_orders(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<MyOrdersQuery>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = match query.role {
        Side::Buyer => order::list_for_buyer(state.pool(), current_user.id).await?,
        Side::Seller => order::list_for_seller(state.pool(), current_user.id).await?,
    };
    Ok(ok(orders))
}

/// Get one order; readable by its buyer, its seller, or an admin
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = order::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;

    if order.buyer_id != current_user.id
        && order.seller_id != current_user.id
        && !current_user.is_admin()
    {
        return Err(AppError::forbidden("Not authorized to view this order"));
    }
    Ok(ok(order))
}

/// Buyer raises a return on a delivered order
pub async fn request_return(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ReturnOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = lifecycle::request_return(
        state.pool(),
        &current_user,
        id,
        payload,
        state.config.return_window_days,
    )
    .await?;
    Ok(ok_with_message(
        order,
        "Return request submitted successfully",
    ))
}
