//! Domain models
//!
//! Entity structs plus their create/update payloads. sqlx derives are
//! feature-gated behind `db` so non-database consumers stay light.

pub mod listing;
pub mod notification;
pub mod order;
pub mod user;

pub use listing::{Listing, ListingApproval};
pub use notification::{Notification, NotificationCreate, NotificationType};
pub use order::{
    DeliveryAddress, Order, OrderCreate, OrderStatus, PaymentMethod, PaymentStatus, RefundMethod,
    ReturnAction,
};
pub use user::{User, UserRole};
