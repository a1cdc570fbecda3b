//! Request types for the shared crate
//!
//! HTTP payloads accepted by the order engine. Fields the original clients
//! may omit are `Option` so handlers can answer with a specific validation
//! message instead of a generic deserialization failure.

use serde::Deserialize;

use crate::models::{DeliveryAddress, OrderStatus, PaymentMethod, RefundMethod, ReturnAction};

/// Cart checkout payload (POST /api/orders)
///
/// `listing_ids` may repeat an id; each repetition requests one more unit of
/// that listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub listing_ids: Vec<i64>,
    pub delivery_address: Option<DeliveryAddress>,
    pub payment_method: Option<PaymentMethod>,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
}

/// Pre-checkout signature check (POST /api/orders/verify-payment)
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentRequest {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub gateway_signature: String,
}

/// Admin status transition (PUT /api/admin/orders/{id}/status)
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
    /// Strict DD/MM/YYYY; required for shipping statuses
    pub expected_delivery_date: Option<String>,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    /// Only stored on the transition into return_approved
    pub return_pickup_date: Option<String>,
}

/// Buyer return request (PUT /api/orders/{id}/return)
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnOrderRequest {
    pub return_reason: Option<String>,
    pub return_action: Option<ReturnAction>,
    pub refund_method: Option<RefundMethod>,
}

/// Pagination query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    /// Page number (1-based, default: 1)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Items per page (default: 20, max: 100). `limit` accepted as an
    /// alias for older clients.
    #[serde(default = "default_per_page", alias = "limit")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl PaginationQuery {
    /// Get the offset for database queries
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)) as u64 * self.limit() as u64
    }

    /// Get the limit (clamped to max 100)
    pub fn limit(&self) -> u32 {
        std::cmp::min(self.per_page, 100)
    }
}
