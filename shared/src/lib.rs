//! Shared types for Bookstall
//!
//! Common types used by the order engine: domain models, request DTOs,
//! response structures, and utility functions (timestamps, snowflake IDs).

pub mod models;
pub mod request;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use response::{ApiResponse, PaginatedResponse, Pagination};
