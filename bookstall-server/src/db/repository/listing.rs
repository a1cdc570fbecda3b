//! Listing Repository (inventory ledger)
//!
//! Owns the only two mutations of a listing's stock: [`reserve`] and
//! [`release`]. Both are single conditional UPDATEs, so concurrent
//! reservations of the last unit cannot both succeed and no
//! read-then-write window exists.

use shared::models::Listing;
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult};

const LISTING_COLUMNS: &str = "id, seller_id, title, author, price, quantity, approval_status, is_available, is_sold, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Listing>> {
    let listing = sqlx::query_as::<_, Listing>(&format!(
        "SELECT {LISTING_COLUMNS} FROM listings WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(listing)
}

/// Fetch several listings by id. Missing ids are simply absent from the
/// result; the caller compares counts.
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<Listing>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql =
        format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, Listing>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let listings = query.fetch_all(pool).await?;
    Ok(listings)
}

/// Atomically take `quantity` units off a listing's stock.
///
/// The decrement only applies while `quantity >= ?`; hitting zero flips
/// the listing to sold/unavailable in the same statement. Returns the
/// remaining quantity.
pub async fn reserve(pool: &SqlitePool, id: i64, quantity: i64) -> RepoResult<i64> {
    if quantity <= 0 {
        return Err(RepoError::Validation(format!(
            "Reservation quantity must be positive, got {quantity}"
        )));
    }

    let rows = sqlx::query(
        "UPDATE listings SET \
             quantity = quantity - ?1, \
             is_sold = CASE WHEN quantity - ?1 <= 0 THEN 1 ELSE 0 END, \
             is_available = CASE WHEN quantity - ?1 <= 0 THEN 0 ELSE 1 END, \
             updated_at = ?2 \
         WHERE id = ?3 AND quantity >= ?1",
    )
    .bind(quantity)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        // Distinguish a stale cart from a stock shortfall
        return match find_by_id(pool, id).await? {
            Some(listing) => Err(RepoError::InsufficientStock {
                required: quantity,
                available: listing.quantity,
            }),
            None => Err(RepoError::NotFound(format!("Listing {id} not found"))),
        };
    }

    let remaining = sqlx::query_scalar::<_, i64>("SELECT quantity FROM listings WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(remaining)
}

/// Return `quantity` units to a listing's stock.
pub async fn release(pool: &SqlitePool, id: i64, quantity: i64) -> RepoResult<()> {
    let mut conn = pool.acquire().await?;
    release_in(&mut conn, id, quantity).await
}

/// Transactional variant of [`release`], for callers that must pair the
/// stock restore with other writes.
pub async fn release_in(conn: &mut SqliteConnection, id: i64, quantity: i64) -> RepoResult<()> {
    if quantity <= 0 {
        return Err(RepoError::Validation(format!(
            "Release quantity must be positive, got {quantity}"
        )));
    }

    // Administratively withdrawn listings get their units back but stay
    // off the market.
    let rows = sqlx::query(
        "UPDATE listings SET \
             quantity = quantity + ?1, \
             is_sold = CASE WHEN approval_status = 'rejected' THEN is_sold ELSE 0 END, \
             is_available = CASE WHEN approval_status = 'rejected' THEN is_available ELSE 1 END, \
             updated_at = ?2 \
         WHERE id = ?3",
    )
    .bind(quantity)
    .bind(now_millis())
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Listing {id} not found")));
    }
    Ok(())
}
