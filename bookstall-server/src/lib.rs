//! Bookstall Server - 二手书市场订单引擎
//!
//! Order and fulfillment transaction engine for a used-book marketplace:
//! turns carts into durable orders without overselling, verifies gateway
//! payment signatures, and drives each order through its fulfillment and
//! return lifecycle.
//!
//! # 模块结构
//!
//! ```text
//! bookstall-server/src/
//! ├── core/        # 配置、状态
//! ├── api/         # HTTP 路由和处理器
//! ├── checkout/    # 下单流程 (cart -> orders)
//! ├── lifecycle/   # 订单状态机
//! ├── payment/     # 支付签名校验
//! ├── notify/      # 通知分发
//! ├── db/          # 数据库层 (SQLite + repositories)
//! └── utils/       # 错误、日志、金额、时间工具
//! ```

pub mod api;
pub mod checkout;
pub mod core;
pub mod db;
pub mod lifecycle;
pub mod notify;
pub mod payment;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, ServerState};
pub use utils::{AppError, AppResult};
