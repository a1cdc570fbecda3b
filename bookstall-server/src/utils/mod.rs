//! 工具模块
//!
//! - [`error`] - 统一错误类型和响应辅助函数
//! - [`logger`] - tracing 初始化
//! - [`money`] - 金额精确计算 (rust_decimal)
//! - [`time`] - 日期解析/格式化
//! - [`validation`] - 输入校验辅助函数

pub mod error;
pub mod logger;
pub mod money;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResult, ok, ok_with_message};
