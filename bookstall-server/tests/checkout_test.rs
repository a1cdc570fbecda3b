//! Checkout 集成测试 (下单流程)
//!
//! Runs the real engine against a tempfile database: stock is taken with
//! conditional updates, so concurrent carts can never oversell, and a
//! failed cart leaves no trace.

mod common;

use bookstall_server::checkout;
use bookstall_server::db::repository::{listing, notification, order};
use bookstall_server::payment;
use shared::models::{OrderStatus, PaymentMethod, PaymentStatus, UserRole};
use shared::request::CheckoutRequest;

use common::{GATEWAY_SECRET, delivery_address, seed_listing, seed_user, spawn_app};

fn cart(listing_ids: Vec<i64>) -> CheckoutRequest {
    CheckoutRequest {
        listing_ids,
        delivery_address: Some(delivery_address()),
        payment_method: None,
        gateway_order_id: None,
        gateway_payment_id: None,
        gateway_signature: None,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_checkouts_never_oversell() {
    let app = spawn_app().await;
    let seller = seed_user(&app.state, 1, "seller", UserRole::User).await;
    seed_listing(&app.state, 10, seller.id, "Dune", 12.50, 3).await;

    let mut buyers = Vec::new();
    for i in 0..8 {
        buyers.push(seed_user(&app.state, 100 + i, &format!("buyer{i}"), UserRole::User).await);
    }

    let mut handles = Vec::new();
    for buyer in buyers {
        let state = app.state.clone();
        handles.push(tokio::spawn(async move {
            checkout::place_order(state.pool(), GATEWAY_SECRET, &buyer, cart(vec![10])).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 3, "exactly the available stock must sell");

    let l = listing::find_by_id(app.state.pool(), 10)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(l.quantity, 0);
    assert!(l.is_sold);
    assert!(!l.is_available);

    let total_orders = order::count_admin(app.state.pool(), &[], None).await.unwrap();
    assert_eq!(total_orders, 3);

    let seller_notes = notification::list_for_user(app.state.pool(), seller.id)
        .await
        .unwrap();
    assert_eq!(seller_notes.len(), 3);
}

#[tokio::test]
async fn repeated_cart_ids_collapse_into_one_order_line() {
    let app = spawn_app().await;
    let seller = seed_user(&app.state, 1, "seller", UserRole::User).await;
    let buyer = seed_user(&app.state, 2, "buyer", UserRole::User).await;
    seed_listing(&app.state, 10, seller.id, "Dune", 10.00, 5).await;
    seed_listing(&app.state, 11, seller.id, "Neuromancer", 2.50, 1).await;

    let outcome = checkout::place_order(
        app.state.pool(),
        GATEWAY_SECRET,
        &buyer,
        cart(vec![10, 10, 11]),
    )
    .await
    .unwrap();

    assert_eq!(outcome.orders.len(), 2);
    assert_eq!(outcome.total_amount, 22.50);

    let dune_order = &outcome.orders[0];
    assert_eq!(dune_order.listing_id, 10);
    assert_eq!(dune_order.quantity, 2);
    assert_eq!(dune_order.total_amount, 20.00);
    assert_eq!(dune_order.status, OrderStatus::Processing);
    assert_eq!(dune_order.payment_method, PaymentMethod::Cod);
    assert_eq!(dune_order.payment_status, PaymentStatus::Pending);
    assert_eq!(dune_order.buyer_id, buyer.id);
    assert_eq!(dune_order.seller_id, seller.id);
    // The address snapshot is copied onto the order, not referenced.
    assert_eq!(dune_order.delivery_address.city.as_deref(), Some("Chennai"));

    let second = &outcome.orders[1];
    assert_eq!(second.listing_id, 11);
    assert_eq!(second.quantity, 1);
    assert_eq!(second.total_amount, 2.50);

    let dune = listing::find_by_id(app.state.pool(), 10)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dune.quantity, 3);
    assert!(!dune.is_sold);
    let neuro = listing::find_by_id(app.state.pool(), 11)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(neuro.quantity, 0);
    assert!(neuro.is_sold);

    // Seller hears about each line, buyer gets one confirmation.
    let seller_notes = notification::list_for_user(app.state.pool(), seller.id)
        .await
        .unwrap();
    assert_eq!(seller_notes.len(), 2);
    assert!(
        seller_notes
            .iter()
            .any(|n| n.message.contains("\"Dune\"")
                && n.message.contains("by buyer")
                && n.message.contains("(Qty: 2)"))
    );
    let buyer_notes = notification::list_for_user(app.state.pool(), buyer.id)
        .await
        .unwrap();
    assert_eq!(buyer_notes.len(), 1);
}

#[tokio::test]
async fn failed_cart_line_reserves_nothing() {
    let app = spawn_app().await;
    let seller = seed_user(&app.state, 1, "seller", UserRole::User).await;
    let buyer = seed_user(&app.state, 2, "buyer", UserRole::User).await;
    seed_listing(&app.state, 10, seller.id, "Dune", 10.00, 5).await;
    seed_listing(&app.state, 11, seller.id, "Neuromancer", 2.50, 1).await;

    // Second line wants two units of a single-unit listing.
    let err = checkout::place_order(
        app.state.pool(),
        GATEWAY_SECRET,
        &buyer,
        cart(vec![10, 11, 11]),
    )
    .await
    .unwrap_err();
    assert!(
        err.to_string().contains(
            "\"Neuromancer\" is not available or out of stock. Required: 2, Available: 1"
        ),
        "got: {err}"
    );

    let dune = listing::find_by_id(app.state.pool(), 10)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dune.quantity, 5, "first line must not stay reserved");

    let total_orders = order::count_admin(app.state.pool(), &[], None).await.unwrap();
    assert_eq!(total_orders, 0);
    assert!(
        notification::list_for_user(app.state.pool(), seller.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn self_purchase_is_rejected() {
    let app = spawn_app().await;
    let seller = seed_user(&app.state, 1, "seller", UserRole::User).await;
    seed_listing(&app.state, 10, seller.id, "Dune", 10.00, 5).await;

    let err = checkout::place_order(app.state.pool(), GATEWAY_SECRET, &seller, cart(vec![10]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("You cannot buy your own book"));

    let l = listing::find_by_id(app.state.pool(), 10)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(l.quantity, 5);
}

#[tokio::test]
async fn unknown_listing_fails_the_whole_cart() {
    let app = spawn_app().await;
    let seller = seed_user(&app.state, 1, "seller", UserRole::User).await;
    let buyer = seed_user(&app.state, 2, "buyer", UserRole::User).await;
    seed_listing(&app.state, 10, seller.id, "Dune", 10.00, 5).await;

    let err = checkout::place_order(
        app.state.pool(),
        GATEWAY_SECRET,
        &buyer,
        cart(vec![10, 999_999]),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("One or more books not found"));

    let l = listing::find_by_id(app.state.pool(), 10)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(l.quantity, 5);
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let app = spawn_app().await;
    let buyer = seed_user(&app.state, 2, "buyer", UserRole::User).await;

    let err = checkout::place_order(app.state.pool(), GATEWAY_SECRET, &buyer, cart(vec![]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Books are required"));
}

#[tokio::test]
async fn missing_delivery_address_is_rejected() {
    let app = spawn_app().await;
    let seller = seed_user(&app.state, 1, "seller", UserRole::User).await;
    let buyer = seed_user(&app.state, 2, "buyer", UserRole::User).await;
    seed_listing(&app.state, 10, seller.id, "Dune", 10.00, 5).await;

    let mut req = cart(vec![10]);
    req.delivery_address = None;

    let err = checkout::place_order(app.state.pool(), GATEWAY_SECRET, &buyer, req)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation failed: Delivery address is required"
    );

    // Nothing written: no order row, no reserved stock.
    let l = listing::find_by_id(app.state.pool(), 10)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(l.quantity, 5);
    let total_orders = order::count_admin(app.state.pool(), &[], None).await.unwrap();
    assert_eq!(total_orders, 0);
}

#[tokio::test]
async fn online_payment_requires_gateway_details() {
    let app = spawn_app().await;
    let seller = seed_user(&app.state, 1, "seller", UserRole::User).await;
    let buyer = seed_user(&app.state, 2, "buyer", UserRole::User).await;
    seed_listing(&app.state, 10, seller.id, "Dune", 10.00, 5).await;

    let mut req = cart(vec![10]);
    req.payment_method = Some(PaymentMethod::Online);

    let err = checkout::place_order(app.state.pool(), GATEWAY_SECRET, &buyer, req)
        .await
        .unwrap_err();
    assert!(
        err.to_string()
            .contains("Payment details are required for online payment")
    );

    let l = listing::find_by_id(app.state.pool(), 10)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(l.quantity, 5);
}

#[tokio::test]
async fn online_payment_verifies_the_gateway_signature() {
    let app = spawn_app().await;
    let seller = seed_user(&app.state, 1, "seller", UserRole::User).await;
    let buyer = seed_user(&app.state, 2, "buyer", UserRole::User).await;
    seed_listing(&app.state, 10, seller.id, "Dune", 10.00, 5).await;

    let mut req = cart(vec![10]);
    req.payment_method = Some(PaymentMethod::Online);
    req.gateway_order_id = Some("ord_1".into());
    req.gateway_payment_id = Some("pay_1".into());
    req.gateway_signature = Some("0000".into());

    let err = checkout::place_order(app.state.pool(), GATEWAY_SECRET, &buyer, req.clone())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Payment verification failed"));
    let l = listing::find_by_id(app.state.pool(), 10)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(l.quantity, 5, "failed verification must not touch stock");

    req.gateway_signature = Some(payment::sign(GATEWAY_SECRET, "ord_1", "pay_1"));
    let outcome = checkout::place_order(app.state.pool(), GATEWAY_SECRET, &buyer, req)
        .await
        .unwrap();
    let placed = &outcome.orders[0];
    assert_eq!(placed.payment_method, PaymentMethod::Online);
    assert_eq!(placed.payment_status, PaymentStatus::Paid);
    assert_eq!(placed.gateway_order_id.as_deref(), Some("ord_1"));
    assert_eq!(placed.gateway_payment_id.as_deref(), Some("pay_1"));
}
