//! User Repository
//!
//! Read-only projection; rows are seeded by the identity layer.

use shared::models::User;
use sqlx::SqlitePool;

use super::RepoResult;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, role, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}
