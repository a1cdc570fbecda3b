//! Order Repository
//!
//! Orders are inserted once (checkout) and mutated only through the
//! version-checked status writes below. The `version` column is an
//! optimistic concurrency counter; every write bumps it and carries the
//! caller's expected value in the WHERE clause.

use shared::models::{Order, OrderCreate, OrderStatus, PaymentStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult};

const ORDER_COLUMNS: &str = "id, listing_id, buyer_id, seller_id, status, quantity, total_amount, payment_method, payment_status, gateway_order_id, gateway_payment_id, gateway_signature, delivery_address, tracking_number, expected_delivery_date, delivered_at, return_reason, return_action, refund_method, return_date, return_pickup_date, notes, version, created_at, updated_at";

/// Field set applied by a status transition. `None` keeps the stored
/// value; `delivered_at` is only ever stamped once (COALESCE keeps the
/// first value).
#[derive(Debug, Clone)]
pub struct OrderStatusWrite {
    pub status: OrderStatus,
    pub expected_delivery_date: Option<i64>,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    pub return_pickup_date: Option<String>,
    pub delivered_at: Option<i64>,
    pub payment_status: Option<PaymentStatus>,
}

impl OrderStatusWrite {
    pub fn new(status: OrderStatus) -> Self {
        Self {
            status,
            expected_delivery_date: None,
            tracking_number: None,
            notes: None,
            return_pickup_date: None,
            delivered_at: None,
            payment_status: None,
        }
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order =
        sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(order)
}

/// Insert one order inside the caller's transaction and return it.
pub async fn insert_in(conn: &mut SqliteConnection, data: OrderCreate) -> RepoResult<Order> {
    let id = snowflake_id();
    let now = now_millis();

    sqlx::query(
        "INSERT INTO orders (id, listing_id, buyer_id, seller_id, status, quantity, total_amount, payment_method, payment_status, gateway_order_id, gateway_payment_id, gateway_signature, delivery_address, version, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
    )
    .bind(id)
    .bind(data.listing_id)
    .bind(data.buyer_id)
    .bind(data.seller_id)
    .bind(OrderStatus::Processing)
    .bind(data.quantity)
    .bind(data.total_amount)
    .bind(data.payment_method)
    .bind(data.payment_status)
    .bind(&data.gateway_order_id)
    .bind(&data.gateway_payment_id)
    .bind(&data.gateway_signature)
    .bind(sqlx::types::Json(&data.delivery_address))
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    let order =
        sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;
    Ok(order)
}

pub async fn list_for_buyer(pool: &SqlitePool, buyer_id: i64) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE buyer_id = ? ORDER BY created_at DESC"
    ))
    .bind(buyer_id)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

pub async fn list_for_seller(pool: &SqlitePool, seller_id: i64) -> RepoResult<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE seller_id = ? ORDER BY created_at DESC"
    ))
    .bind(seller_id)
    .fetch_all(pool)
    .await?;
    Ok(orders)
}

fn admin_filter_sql(statuses: &[OrderStatus], search: Option<&str>) -> String {
    let mut clauses = Vec::new();
    if !statuses.is_empty() {
        clauses.push(format!(
            "status IN ({})",
            vec!["?"; statuses.len()].join(", ")
        ));
    }
    if search.is_some() {
        clauses.push("tracking_number LIKE ?".to_string());
    }
    if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    }
}

/// Admin listing: optional status set, optional tracking-number substring
/// search (LIKE is case-insensitive for ASCII), newest first.
pub async fn list_admin(
    pool: &SqlitePool,
    statuses: &[OrderStatus],
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {ORDER_COLUMNS} FROM orders{} ORDER BY created_at DESC LIMIT ? OFFSET ?",
        admin_filter_sql(statuses, search)
    );
    let mut query = sqlx::query_as::<_, Order>(&sql);
    for status in statuses {
        query = query.bind(*status);
    }
    if let Some(term) = search {
        query = query.bind(format!("%{term}%"));
    }
    let orders = query.bind(limit).bind(offset).fetch_all(pool).await?;
    Ok(orders)
}

pub async fn count_admin(
    pool: &SqlitePool,
    statuses: &[OrderStatus],
    search: Option<&str>,
) -> RepoResult<u64> {
    let sql = format!(
        "SELECT COUNT(*) FROM orders{}",
        admin_filter_sql(statuses, search)
    );
    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for status in statuses {
        query = query.bind(*status);
    }
    if let Some(term) = search {
        query = query.bind(format!("%{term}%"));
    }
    let count = query.fetch_one(pool).await?;
    Ok(count as u64)
}

/// Version-checked status write on the pool.
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    expected_version: i64,
    write: OrderStatusWrite,
) -> RepoResult<()> {
    let mut conn = pool.acquire().await?;
    update_status_in(&mut conn, id, expected_version, write).await
}

/// Version-checked status write inside the caller's transaction.
pub async fn update_status_in(
    conn: &mut SqliteConnection,
    id: i64,
    expected_version: i64,
    write: OrderStatusWrite,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE orders SET \
             status = ?1, \
             expected_delivery_date = COALESCE(?2, expected_delivery_date), \
             tracking_number = COALESCE(?3, tracking_number), \
             notes = COALESCE(?4, notes), \
             return_pickup_date = COALESCE(?5, return_pickup_date), \
             delivered_at = COALESCE(delivered_at, ?6), \
             payment_status = COALESCE(?7, payment_status), \
             version = version + 1, \
             updated_at = ?8 \
         WHERE id = ?9 AND version = ?10",
    )
    .bind(write.status)
    .bind(write.expected_delivery_date)
    .bind(&write.tracking_number)
    .bind(&write.notes)
    .bind(&write.return_pickup_date)
    .bind(write.delivered_at)
    .bind(write.payment_status)
    .bind(now_millis())
    .bind(id)
    .bind(expected_version)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(cas_miss(conn, id).await);
    }
    Ok(())
}

/// Buyer return request: version-checked flip into `return_requested`
/// with the return fields recorded.
pub async fn record_return_request(
    pool: &SqlitePool,
    id: i64,
    expected_version: i64,
    reason: &str,
    action: shared::models::ReturnAction,
    refund_method: Option<shared::models::RefundMethod>,
) -> RepoResult<()> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET \
             status = ?1, \
             return_reason = ?2, \
             return_action = ?3, \
             refund_method = ?4, \
             return_date = ?5, \
             version = version + 1, \
             updated_at = ?5 \
         WHERE id = ?6 AND version = ?7",
    )
    .bind(OrderStatus::ReturnRequested)
    .bind(reason)
    .bind(action)
    .bind(refund_method)
    .bind(now)
    .bind(id)
    .bind(expected_version)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        let mut conn = pool.acquire().await?;
        return Err(cas_miss(&mut conn, id).await);
    }
    Ok(())
}

/// Classify a zero-row version-checked write: vanished row vs lost race.
async fn cas_miss(conn: &mut SqliteConnection, id: i64) -> RepoError {
    match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await
    {
        Ok(0) => RepoError::NotFound(format!("Order {id} not found")),
        Ok(_) => RepoError::Conflict("Order was modified concurrently".to_string()),
        Err(e) => e.into(),
    }
}
