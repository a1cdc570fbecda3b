//! Order Lifecycle (订单状态机)
//!
//! Status moves along a fixed graph: the admin drives shipping and return
//! resolution, the buyer raises returns on delivered orders. Writes are
//! version-checked; transitions that hand stock back (cancelled, returned)
//! pair the order write with the inventory release in one transaction.

use shared::models::{Order, OrderStatus, PaymentStatus, ReturnAction};
use shared::request::{ReturnOrderRequest, UpdateOrderStatusRequest};
use shared::util::now_millis;
use sqlx::SqlitePool;

use crate::api::auth::CurrentUser;
use crate::db::repository::order::OrderStatusWrite;
use crate::db::repository::{RepoError, RepoResult, listing, order};
use crate::notify;
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, time};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Allowed edges of the status graph.
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    if from == to {
        // Re-applying lets the admin attach tracking, notes or a new date
        // without moving state. Cancelled and returned are excluded: they
        // release stock on entry and must not run twice.
        return matches!(from, Processing | Sold | PickedUp | InTransit | Delivered);
    }
    matches!(
        (from, to),
        (Processing, Sold | PickedUp | InTransit | Cancelled)
            | (Sold, PickedUp | InTransit | Delivered | Cancelled)
            | (PickedUp, InTransit | Delivered | Cancelled)
            | (InTransit, Delivered | Cancelled)
            | (Delivered, ReturnRequested)
            | (ReturnRequested, ReturnApproved | ReturnRejected)
            | (ReturnApproved, Returned)
    )
}

/// Shipping statuses that must carry an expected delivery date. `sold`
/// deliberately does not: legacy seller tooling sets it without one.
pub fn requires_delivery_date(status: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(status, Processing | PickedUp | InTransit | Delivered)
}

/// Admin status update (PUT /api/admin/orders/{id}/status).
pub async fn update_status(
    pool: &SqlitePool,
    actor: &CurrentUser,
    order_id: i64,
    req: UpdateOrderStatusRequest,
) -> AppResult<Order> {
    if !actor.is_admin() {
        return Err(AppError::forbidden("Admin access required"));
    }

    let current = order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;

    let target = req.status;
    if target == OrderStatus::ReturnRequested {
        return Err(AppError::validation(
            "Return requests are raised by the buyer",
        ));
    }
    if !can_transition(current.status, target) {
        return Err(AppError::business_rule(format!(
            "Cannot change order status from {} to {}",
            current.status, target
        )));
    }

    validate_optional_text(&req.tracking_number, "tracking_number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.notes, "notes", MAX_NOTE_LEN)?;
    validate_optional_text(&req.return_pickup_date, "return_pickup_date", MAX_SHORT_TEXT_LEN)?;

    let expected_delivery_date = if requires_delivery_date(target) {
        let Some(raw) = req.expected_delivery_date.as_deref() else {
            return Err(AppError::validation(
                "Expected delivery date is required in DD/MM/YYYY format",
            ));
        };
        Some(time::parse_delivery_date(raw)?)
    } else {
        None
    };

    let mut write = OrderStatusWrite::new(target);
    write.expected_delivery_date = expected_delivery_date;
    write.tracking_number = req.tracking_number;
    write.notes = req.notes;
    if target == OrderStatus::ReturnApproved {
        write.return_pickup_date = req.return_pickup_date;
    }
    if target == OrderStatus::Delivered {
        write.delivered_at = Some(now_millis());
    }
    if target == OrderStatus::Returned
        && current.return_action == Some(ReturnAction::Refund)
        && current.payment_status == PaymentStatus::Paid
    {
        write.payment_status = Some(PaymentStatus::Refunded);
    }

    let written = if matches!(target, OrderStatus::Cancelled | OrderStatus::Returned) {
        release_and_write(pool, &current, write).await
    } else {
        order::update_status(pool, current.id, current.version, write).await
    };
    if let Err(err) = written {
        return Err(match err {
            RepoError::Duplicate(_) => AppError::conflict("Tracking number already in use"),
            other => other.into(),
        });
    }

    let updated = order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;

    // The date suffix reads the stored order, not the request: a cancel
    // after shipping still names the promised date.
    let mut message = format!("Your order status has been updated to {target}");
    if let Some(millis) = updated.expected_delivery_date {
        message.push_str(&format!(
            " (Expected delivery: {})",
            time::format_en_gb(millis)
        ));
    }
    notify::order_event(
        pool,
        updated.buyer_id,
        message,
        Some(updated.id),
        Some(updated.listing_id),
    )
    .await;

    Ok(updated)
}

/// Buyer return request (PUT /api/orders/{id}/return).
pub async fn request_return(
    pool: &SqlitePool,
    actor: &CurrentUser,
    order_id: i64,
    req: ReturnOrderRequest,
    window_days: i64,
) -> AppResult<Order> {
    let current = order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;

    if current.buyer_id != actor.id {
        return Err(AppError::forbidden("Not authorized to return this order"));
    }
    if current.status != OrderStatus::Delivered {
        return Err(AppError::business_rule(
            "Only delivered orders can be returned",
        ));
    }

    // Orders delivered before delivered_at existed fall back to updated_at.
    let delivered_at = current.delivered_at.unwrap_or(current.updated_at);
    if now_millis() - delivered_at > window_days * MILLIS_PER_DAY {
        return Err(AppError::business_rule(format!(
            "Return window closed. Orders can only be returned within {window_days} days of delivery."
        )));
    }

    let (Some(reason), Some(action)) = (req.return_reason.as_deref(), req.return_action) else {
        return Err(AppError::validation(
            "Please provide return reason and preferred action",
        ));
    };
    validate_required_text(reason, "return_reason", MAX_NOTE_LEN)?;

    let refund_method = match action {
        ReturnAction::Refund => {
            let Some(method) = req.refund_method else {
                return Err(AppError::validation("Please provide a refund method"));
            };
            Some(method)
        }
        ReturnAction::Replace => None,
    };

    order::record_return_request(
        pool,
        current.id,
        current.version,
        reason,
        action,
        refund_method,
    )
    .await?;

    let updated = order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;

    notify::order_event(
        pool,
        updated.seller_id,
        format!(
            "Return requested for book order #{} by {}. Reason: {reason}",
            updated.id, actor.username
        ),
        Some(updated.id),
        Some(updated.listing_id),
    )
    .await;

    Ok(updated)
}

/// Stock-releasing transitions write the order and hand the units back to
/// the listing in one transaction.
async fn release_and_write(
    pool: &SqlitePool,
    current: &Order,
    write: OrderStatusWrite,
) -> RepoResult<()> {
    let mut tx = pool.begin().await?;
    order::update_status_in(&mut tx, current.id, current.version, write).await?;
    listing::release_in(&mut tx, current.listing_id, current.quantity).await?;
    tx.commit().await?;
    Ok(())
}
