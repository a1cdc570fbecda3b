//! Admin Order API Handlers

use std::str::FromStr;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Order, OrderStatus};
use shared::request::{PaginationQuery, UpdateOrderStatusRequest};
use shared::{ApiResponse, PaginatedResponse};

use crate::api::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::lifecycle;
use crate::utils::{AppError, AppResult, ok, ok_with_message};

/// Filter params for the admin order list
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Comma-separated statuses, e.g. `processing,in_transit`
    pub status: Option<String>,
    /// Tracking-number substring
    pub search: Option<String>,
}

/// List all orders with optional filters (paginated)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<Json<ApiResponse<PaginatedResponse<Order>>>> {
    let statuses = parse_status_filter(query.status.as_deref())?;

    let limit = pagination.limit();
    let offset = pagination.offset();
    let orders = order::list_admin(
        state.pool(),
        &statuses,
        query.search.as_deref(),
        limit as i64,
        offset as i64,
    )
    .await?;
    let total = order::count_admin(state.pool(), &statuses, query.search.as_deref()).await?;

    Ok(ok(PaginatedResponse::new(
        orders,
        pagination.page,
        limit,
        total,
    )))
}

fn parse_status_filter(raw: Option<&str>) -> AppResult<Vec<OrderStatus>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| OrderStatus::from_str(part).map_err(AppError::validation))
        .collect()
}

/// Move an order along the lifecycle graph
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = lifecycle::update_status(state.pool(), &current_user, id, payload).await?;
    Ok(ok_with_message(order, "Order status updated successfully"))
}
