//! Notification Repository
//!
//! Inserts rows for the out-of-band delivery worker; the engine never
//! reads them back outside of tests.

use shared::models::{Notification, NotificationCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::RepoResult;

const NOTIFICATION_COLUMNS: &str = "id, user_id, message, is_read, notification_type, \
     related_order_id, related_listing_id, created_at";

pub async fn insert(pool: &SqlitePool, data: NotificationCreate) -> RepoResult<Notification> {
    let id = snowflake_id();
    let now = now_millis();

    sqlx::query(
        "INSERT INTO notifications (id, user_id, message, is_read, notification_type, \
         related_order_id, related_listing_id, created_at) \
         VALUES (?, ?, ?, 0, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.user_id)
    .bind(&data.message)
    .bind(data.notification_type)
    .bind(data.related_order_id)
    .bind(data.related_listing_id)
    .bind(now)
    .execute(pool)
    .await?;

    let notification = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?"
    ))
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(notification)
}

pub async fn list_for_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Notification>> {
    let rows = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
         WHERE user_id = ? ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
