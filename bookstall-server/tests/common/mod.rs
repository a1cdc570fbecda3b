//! 集成测试基础设施
//!
//! Tempfile-backed database driven through the real [`ServerState`], with
//! helpers for seeding the users and listings the engine only reads.

use bookstall_server::api::auth::CurrentUser;
use bookstall_server::core::{Config, ServerState};
use bookstall_server::db::DbService;
use shared::models::{DeliveryAddress, UserRole};
use tempfile::TempDir;

pub const GATEWAY_SECRET: &str = "test-gateway-secret";

/// Checkout rejects an absent address, so every test cart ships with one.
pub fn delivery_address() -> DeliveryAddress {
    DeliveryAddress {
        full_name: Some("Ravi Kumar".into()),
        phone: Some("9840012345".into()),
        address_line1: Some("14 Harbour Road".into()),
        city: Some("Chennai".into()),
        state: Some("Tamil Nadu".into()),
        pincode: Some("600001".into()),
        ..DeliveryAddress::default()
    }
}

pub struct TestApp {
    pub state: ServerState,
    // Keeps the database file alive for the duration of the test.
    _tmp: TempDir,
}

pub fn test_config(db_path: &str) -> Config {
    Config {
        database_path: db_path.to_string(),
        http_port: 0,
        payment_gateway_secret: GATEWAY_SECRET.to_string(),
        return_window_days: 7,
        environment: "test".to_string(),
        log_dir: None,
    }
}

pub async fn spawn_app() -> TestApp {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp
        .path()
        .join("bookstall-test.db")
        .to_str()
        .unwrap()
        .to_string();
    let db = DbService::new(&db_path).await.unwrap();
    let state = ServerState::with_db(test_config(&db_path), db);
    TestApp { state, _tmp: tmp }
}

pub async fn seed_user(
    state: &ServerState,
    id: i64,
    username: &str,
    role: UserRole,
) -> CurrentUser {
    let role_str = match role {
        UserRole::Admin => "admin",
        UserRole::User => "user",
    };
    sqlx::query("INSERT INTO users (id, username, email, role, created_at) VALUES (?, ?, ?, ?, 0)")
        .bind(id)
        .bind(username)
        .bind(format!("{username}@example.com"))
        .bind(role_str)
        .execute(state.pool())
        .await
        .unwrap();

    CurrentUser {
        id,
        username: username.to_string(),
        role,
    }
}

pub async fn seed_listing(
    state: &ServerState,
    id: i64,
    seller_id: i64,
    title: &str,
    price: f64,
    quantity: i64,
) {
    sqlx::query(
        "INSERT INTO listings (id, seller_id, title, author, price, quantity, \
         approval_status, is_available, is_sold, created_at, updated_at) \
         VALUES (?, ?, ?, NULL, ?, ?, 'approved', 1, 0, 0, 0)",
    )
    .bind(id)
    .bind(seller_id)
    .bind(title)
    .bind(price)
    .bind(quantity)
    .execute(state.pool())
    .await
    .unwrap();
}
