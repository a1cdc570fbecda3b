//! 服务器状态
//!
//! [`ServerState`] holds the shared handles every handler needs. It is
//! cheap to clone; axum clones it per request.

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

/// Shared server state: configuration plus the database service.
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置 (不可变)
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
}

impl ServerState {
    /// Open the database, apply migrations, and assemble the state.
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self {
            config: config.clone(),
            db,
        })
    }

    /// Build a state around an already-open database (tests).
    pub fn with_db(config: Config, db: DbService) -> Self {
        Self { config, db }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}
