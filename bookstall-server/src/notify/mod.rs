//! Notification Dispatcher (通知分发)
//!
//! Persists notification rows for the out-of-band delivery worker.
//! Dispatch is best-effort: a failed insert is logged at WARN and
//! dropped, it never unwinds a committed order.

use shared::models::{NotificationCreate, NotificationType};
use sqlx::SqlitePool;

use crate::db::repository::notification;

/// Queue an order-related notification for `user_id`.
pub async fn order_event(
    pool: &SqlitePool,
    user_id: i64,
    message: String,
    related_order_id: Option<i64>,
    related_listing_id: Option<i64>,
) {
    dispatch(
        pool,
        NotificationCreate {
            user_id,
            message,
            notification_type: NotificationType::Order,
            related_order_id,
            related_listing_id,
        },
    )
    .await;
}

pub async fn dispatch(pool: &SqlitePool, data: NotificationCreate) {
    let user_id = data.user_id;
    let order_id = data.related_order_id;
    if let Err(err) = notification::insert(pool, data).await {
        tracing::warn!(user_id, order_id, error = %err, "notification dispatch failed, dropping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool(with_table: bool) -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        if with_table {
            sqlx::query(
                "CREATE TABLE notifications (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    message TEXT NOT NULL,
                    is_read INTEGER NOT NULL DEFAULT 0,
                    notification_type TEXT NOT NULL DEFAULT 'system',
                    related_order_id INTEGER,
                    related_listing_id INTEGER,
                    created_at INTEGER NOT NULL
                )",
            )
            .execute(&pool)
            .await
            .unwrap();
        }

        pool
    }

    #[tokio::test]
    async fn persists_order_event() {
        let pool = test_pool(true).await;
        order_event(&pool, 5, "test message".into(), Some(1), None).await;

        let rows = notification::list_for_user(&pool, 5).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].message, "test message");
        assert_eq!(rows[0].notification_type, NotificationType::Order);
    }

    #[tokio::test]
    async fn swallows_insert_failure() {
        // No notifications table at all, the insert must fail quietly.
        let pool = test_pool(false).await;
        order_event(&pool, 5, "test message".into(), Some(1), None).await;
    }
}
