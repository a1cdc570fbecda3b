//! Notification records (通知)
//!
//! The order engine only decides *that* and *what* to notify; persisted rows
//! are picked up by the delivery collaborator (email/push) out of band.

use serde::{Deserialize, Serialize};

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum NotificationType {
    Order,
    Approval,
    System,
}

/// Notification entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub is_read: bool,
    pub notification_type: NotificationType,
    pub related_order_id: Option<i64>,
    pub related_listing_id: Option<i64>,
    pub created_at: i64,
}

/// Payload for inserting a notification
#[derive(Debug, Clone)]
pub struct NotificationCreate {
    pub user_id: i64,
    pub message: String,
    pub notification_type: NotificationType,
    pub related_order_id: Option<i64>,
    pub related_listing_id: Option<i64>,
}
