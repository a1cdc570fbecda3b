//! Listing (在售书目)
//!
//! A seller's sellable book entry. The order engine references listings but
//! does not own them; only `quantity` / `is_available` / `is_sold` are
//! mutated here, and only through the inventory ledger's reserve/release.

use serde::{Deserialize, Serialize};

/// Listing approval state. `Rejected` marks an administratively withdrawn
/// listing: released stock never flips it back to available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ListingApproval {
    Pending,
    Approved,
    Rejected,
}

/// Listing entity
///
/// Invariants: `quantity >= 0`; `is_sold == true` implies
/// `is_available == false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Listing {
    pub id: i64,
    pub seller_id: i64,
    pub title: String,
    pub author: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub approval_status: ListingApproval,
    pub is_available: bool,
    pub is_sold: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
