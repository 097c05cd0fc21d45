//! Order placement and visibility across accounts.

#[path = "support/storefront_app.rs"]
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::json;

use support::{create_product, send, sign_up, storefront_app};

#[rstest]
#[actix_web::test]
async fn orders_are_visible_to_their_owner_and_admins_only() {
    let app = test::init_service(storefront_app()).await;
    let admin = sign_up(&app, "Ada", "ada@example.com").await;
    let bob = sign_up(&app, "Bob", "bob@example.com").await;
    let carol = sign_up(&app, "Carol", "carol@example.com").await;
    let lamp = create_product(&app, &admin, "desk lamp", 1_999).await;
    let table = create_product(&app, &admin, "oak table", 49_900).await;

    let placed = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/orders")
            .cookie(bob.clone())
            .set_json(json!({
                "items": [
                    {"product": lamp, "amount": 2},
                    {"product": table, "amount": 1}
                ],
                "tax": 100,
                "shippingFee": 500
            })),
    )
    .await;
    assert_eq!(placed.status, StatusCode::CREATED, "{}", placed.body);
    assert_eq!(placed.body["order"]["subtotal"], 53_898);
    assert_eq!(placed.body["order"]["total"], 54_498);
    assert_eq!(
        placed.body["order"]["orderItems"]
            .as_array()
            .map(Vec::len),
        Some(2)
    );
    let order_uri = format!(
        "/api/v1/orders/{}",
        placed.body["order"]["id"].as_str().expect("order id")
    );

    let as_owner = send(&app, test::TestRequest::get().uri(&order_uri).cookie(bob.clone())).await;
    assert_eq!(as_owner.status, StatusCode::OK);
    let as_admin = send(&app, test::TestRequest::get().uri(&order_uri).cookie(admin.clone())).await;
    assert_eq!(as_admin.status, StatusCode::OK);
    let as_stranger =
        send(&app, test::TestRequest::get().uri(&order_uri).cookie(carol.clone())).await;
    assert_eq!(as_stranger.status, StatusCode::FORBIDDEN);
    assert_eq!(as_stranger.body["code"], "unauthorized");

    let mine = send(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/orders/showAllMyOrders")
            .cookie(carol.clone()),
    )
    .await;
    assert_eq!(mine.body["count"], 0);

    let everyone = send(
        &app,
        test::TestRequest::get().uri("/api/v1/orders").cookie(admin),
    )
    .await;
    assert_eq!(everyone.body["count"], 1);
    let refused = send(&app, test::TestRequest::get().uri("/api/v1/orders").cookie(bob)).await;
    assert_eq!(refused.status, StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn stranger_cannot_confirm_payment() {
    let app = test::init_service(storefront_app()).await;
    let admin = sign_up(&app, "Ada", "ada@example.com").await;
    let bob = sign_up(&app, "Bob", "bob@example.com").await;
    let carol = sign_up(&app, "Carol", "carol@example.com").await;
    let lamp = create_product(&app, &admin, "desk lamp", 1_999).await;
    let placed = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/orders")
            .cookie(bob.clone())
            .set_json(json!({"items": [{"product": lamp, "amount": 1}], "tax": 10, "shippingFee": 10})),
    )
    .await;
    let order_uri = format!(
        "/api/v1/orders/{}",
        placed.body["order"]["id"].as_str().expect("order id")
    );

    let reply = send(
        &app,
        test::TestRequest::patch()
            .uri(&order_uri)
            .cookie(carol)
            .set_json(json!({"paymentIntentId": "pi_999"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let unchanged = send(&app, test::TestRequest::get().uri(&order_uri).cookie(bob)).await;
    assert_eq!(unchanged.body["order"]["status"], "pending");
}

#[rstest]
#[actix_web::test]
async fn orders_require_a_session() {
    let app = test::init_service(storefront_app()).await;
    let reply = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/orders")
            .set_json(json!({"items": [], "tax": 0, "shippingFee": 0})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}
