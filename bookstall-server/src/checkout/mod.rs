//! Checkout (下单)
//!
//! Collapses the cart, validates every listing, verifies online payment,
//! reserves stock all-or-nothing, then writes one order per listing in a
//! single transaction. Reservation happens before that transaction, so a
//! failed insert hands every reserved unit back before the error surfaces.

use serde::Serialize;
use shared::models::{
    DeliveryAddress, Listing, Order, OrderCreate, PaymentMethod, PaymentStatus,
};
use shared::request::CheckoutRequest;
use sqlx::SqlitePool;

use crate::api::auth::CurrentUser;
use crate::db::repository::{RepoError, RepoResult, listing, order};
use crate::notify;
use crate::payment;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
};
use crate::utils::{AppError, AppResult, money};

/// Successful checkout: one order per distinct listing plus the cart total.
#[derive(Debug, Serialize)]
pub struct CheckoutOutcome {
    pub orders: Vec<Order>,
    pub total_amount: f64,
}

pub async fn place_order(
    pool: &SqlitePool,
    gateway_secret: &str,
    buyer: &CurrentUser,
    req: CheckoutRequest,
) -> AppResult<CheckoutOutcome> {
    if req.listing_ids.is_empty() {
        return Err(AppError::validation("Books are required"));
    }

    let Some(delivery_address) = req.delivery_address else {
        return Err(AppError::validation("Delivery address is required"));
    };
    validate_address(&delivery_address)?;

    let payment_method = req.payment_method.unwrap_or(PaymentMethod::Cod);

    // One line per distinct listing, first-seen order; repeats add quantity.
    let lines = collapse_cart(&req.listing_ids);

    let ids: Vec<i64> = lines.iter().map(|(id, _)| *id).collect();
    let listings = listing::find_by_ids(pool, &ids).await?;
    if listings.len() != ids.len() {
        return Err(AppError::not_found("One or more books not found"));
    }

    let mut validated: Vec<(&Listing, i64)> = Vec::with_capacity(lines.len());
    let mut total = rust_decimal::Decimal::ZERO;
    for &(id, required) in &lines {
        let listing = listings
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::internal("Listing set changed during checkout"))?;

        money::validate_quantity(required, "quantity")?;
        if listing.is_sold || !listing.is_available || listing.quantity < required {
            return Err(out_of_stock(&listing.title, required, listing.quantity));
        }
        if listing.seller_id == buyer.id {
            return Err(AppError::business_rule("You cannot buy your own book"));
        }

        total += money::line_total(listing.price, required);
        validated.push((listing, required));
    }

    if payment_method == PaymentMethod::Online {
        let (Some(gateway_order_id), Some(gateway_payment_id), Some(gateway_signature)) = (
            req.gateway_order_id.as_deref(),
            req.gateway_payment_id.as_deref(),
            req.gateway_signature.as_deref(),
        ) else {
            return Err(AppError::validation(
                "Payment details are required for online payment",
            ));
        };
        if !payment::verify_signature(
            gateway_secret,
            gateway_order_id,
            gateway_payment_id,
            gateway_signature,
        ) {
            return Err(AppError::business_rule("Payment verification failed"));
        }
    }
    let payment_status = match payment_method {
        PaymentMethod::Online => PaymentStatus::Paid,
        PaymentMethod::Cod => PaymentStatus::Pending,
    };

    // Reserve every line before writing anything. A mid-cart failure hands
    // back what was already taken so a partial cart never holds stock.
    let mut reserved: Vec<(i64, i64)> = Vec::with_capacity(validated.len());
    for &(listing, required) in &validated {
        if let Err(err) = listing::reserve(pool, listing.id, required).await {
            release_reserved(pool, &reserved).await;
            return Err(match err {
                RepoError::InsufficientStock {
                    required,
                    available,
                } => out_of_stock(&listing.title, required, available),
                other => other.into(),
            });
        }
        reserved.push((listing.id, required));
    }

    let creates: Vec<OrderCreate> = validated
        .iter()
        .map(|&(listing, required)| OrderCreate {
            listing_id: listing.id,
            buyer_id: buyer.id,
            seller_id: listing.seller_id,
            quantity: required,
            total_amount: money::to_f64(money::line_total(listing.price, required)),
            payment_method,
            payment_status,
            gateway_order_id: req.gateway_order_id.clone(),
            gateway_payment_id: req.gateway_payment_id.clone(),
            gateway_signature: req.gateway_signature.clone(),
            delivery_address: delivery_address.clone(),
        })
        .collect();

    let orders = match persist_orders(pool, creates).await {
        Ok(orders) => orders,
        Err(err) => {
            release_reserved(pool, &reserved).await;
            return Err(err.into());
        }
    };

    for order_row in &orders {
        let title = validated
            .iter()
            .find(|(l, _)| l.id == order_row.listing_id)
            .map(|(l, _)| l.title.as_str())
            .unwrap_or_default();
        notify::order_event(
            pool,
            order_row.seller_id,
            format!(
                "Your book \"{title}\" has been purchased by {} (Qty: {})",
                buyer.username, order_row.quantity
            ),
            Some(order_row.id),
            Some(order_row.listing_id),
        )
        .await;
    }

    let total_amount = money::to_f64(total);
    notify::order_event(
        pool,
        buyer.id,
        format!(
            "Your order has been placed: {} book(s), total {total_amount:.2}",
            orders.len()
        ),
        orders.first().map(|o| o.id),
        None,
    )
    .await;

    Ok(CheckoutOutcome {
        orders,
        total_amount,
    })
}

/// All order rows of one cart land in a single transaction. Any failure
/// rolls the whole cart back; the caller releases the reservations.
async fn persist_orders(pool: &SqlitePool, creates: Vec<OrderCreate>) -> RepoResult<Vec<Order>> {
    let mut tx = pool.begin().await?;
    let mut orders = Vec::with_capacity(creates.len());
    for create in creates {
        orders.push(order::insert_in(&mut tx, create).await?);
    }
    tx.commit().await?;
    Ok(orders)
}

async fn release_reserved(pool: &SqlitePool, reserved: &[(i64, i64)]) {
    for &(id, quantity) in reserved {
        if let Err(err) = listing::release(pool, id, quantity).await {
            tracing::error!(listing_id = id, quantity, error = %err, "failed to release reserved stock");
        }
    }
}

fn out_of_stock(title: &str, required: i64, available: i64) -> AppError {
    AppError::business_rule(format!(
        "\"{title}\" is not available or out of stock. Required: {required}, Available: {available}"
    ))
}

fn collapse_cart(ids: &[i64]) -> Vec<(i64, i64)> {
    let mut lines: Vec<(i64, i64)> = Vec::new();
    for &id in ids {
        match lines.iter_mut().find(|(seen, _)| *seen == id) {
            Some((_, count)) => *count += 1,
            None => lines.push((id, 1)),
        }
    }
    lines
}

fn validate_address(address: &DeliveryAddress) -> AppResult<()> {
    validate_optional_text(&address.full_name, "full_name", MAX_NAME_LEN)?;
    validate_optional_text(&address.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&address.address_line1, "address_line1", MAX_ADDRESS_LEN)?;
    validate_optional_text(&address.address_line2, "address_line2", MAX_ADDRESS_LEN)?;
    validate_optional_text(&address.city, "city", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&address.state, "state", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&address.pincode, "pincode", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&address.landmark, "landmark", MAX_ADDRESS_LEN)?;
    Ok(())
}
