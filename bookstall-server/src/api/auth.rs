//! Request identity
//!
//! Authentication lives in the identity service in front of this engine;
//! it forwards the resolved id as the `x-user-id` header. [`require_user`]
//! turns that header into a [`CurrentUser`] by loading the user projection,
//! so a stale id from a deleted account is rejected here.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::models::{User, UserRole};

use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::AppError;

/// Header carrying the authenticated user id, set by the gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated requester
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Resolve the caller and stash it in request extensions.
pub async fn require_user(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight carries no identity.
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or(AppError::Unauthorized)?;

    let user = user::find_by_id(state.pool(), user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    req.extensions_mut().insert(CurrentUser::from(user));
    Ok(next.run(req).await)
}

/// Require an admin caller. Must run inside [`require_user`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;
    if !user.is_admin() {
        return Err(AppError::forbidden("Admin access required"));
    }
    Ok(next.run(req).await)
}
