//! Order models (订单)
//!
//! One order covers units of exactly one listing; a multi-listing cart
//! produces one order per distinct listing. Orders are created only by the
//! checkout flow and their status is mutated only by the lifecycle module.

use serde::{Deserialize, Serialize};

/// Order status
///
/// `sold` is a legacy shipping status kept for compatibility with older
/// seller tooling; it behaves like the other pre-delivery states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    Processing,
    Sold,
    PickedUp,
    InTransit,
    Delivered,
    Cancelled,
    ReturnRequested,
    ReturnApproved,
    ReturnRejected,
    Returned,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "processing",
            OrderStatus::Sold => "sold",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::ReturnRequested => "return_requested",
            OrderStatus::ReturnApproved => "return_approved",
            OrderStatus::ReturnRejected => "return_rejected",
            OrderStatus::Returned => "returned",
        }
    }

    /// Pre-delivery states still hold a live reservation.
    pub fn is_pre_delivery(&self) -> bool {
        matches!(
            self,
            OrderStatus::Processing
                | OrderStatus::Sold
                | OrderStatus::PickedUp
                | OrderStatus::InTransit
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(OrderStatus::Processing),
            "sold" => Ok(OrderStatus::Sold),
            "picked_up" => Ok(OrderStatus::PickedUp),
            "in_transit" => Ok(OrderStatus::InTransit),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "return_requested" => Ok(OrderStatus::ReturnRequested),
            "return_approved" => Ok(OrderStatus::ReturnApproved),
            "return_rejected" => Ok(OrderStatus::ReturnRejected),
            "returned" => Ok(OrderStatus::Returned),
            other => Err(format!("Unknown order status: {other}")),
        }
    }
}

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentMethod {
    /// Cash on delivery
    Cod,
    Online,
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Buyer's preferred outcome of a return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ReturnAction {
    Refund,
    Replace,
}

/// How a refund should be paid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum RefundMethod {
    OriginalSource,
    BankTransfer,
    StoreCredit,
}

/// Delivery address snapshot, copied at checkout (not a live reference to
/// the buyer's profile). Stored as a JSON column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub landmark: Option<String>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub listing_id: i64,
    pub buyer_id: i64,
    /// Denormalized copy of the listing's seller at creation time
    pub seller_id: i64,
    pub status: OrderStatus,
    pub quantity: i64,
    /// unit price x quantity at creation time, immutable afterwards
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub delivery_address: DeliveryAddress,
    /// Unique across orders when present
    pub tracking_number: Option<String>,
    /// Unix millis at UTC midnight of the promised date
    pub expected_delivery_date: Option<i64>,
    /// Stamped on the first transition into delivered, never overwritten
    pub delivered_at: Option<i64>,
    pub return_reason: Option<String>,
    pub return_action: Option<ReturnAction>,
    pub refund_method: Option<RefundMethod>,
    pub return_date: Option<i64>,
    /// Stored verbatim as supplied by the admin
    pub return_pickup_date: Option<String>,
    pub notes: Option<String>,
    /// Optimistic concurrency counter, bumped on every status write
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Payload for persisting one order inside checkout
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub listing_id: i64,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub quantity: i64,
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
    pub delivery_address: DeliveryAddress,
}
