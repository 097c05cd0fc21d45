//! Checkout and order tracking handlers. Every route requires a session.

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CartItem, Checkout, Error, Order, OrderId, ProductId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{entity_id, order_error};

/// One requested cart line.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CartItemRequest {
    /// Product identifier.
    pub product: String,
    #[schema(minimum = 1)]
    pub amount: i64,
}

/// Body of `POST /api/v1/orders`. Charges are in minor units.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<CartItemRequest>,
    pub tax: Option<i64>,
    pub shipping_fee: Option<i64>,
}

impl TryFrom<CreateOrderRequest> for Checkout {
    type Error = Error;

    fn try_from(value: CreateOrderRequest) -> Result<Self, Self::Error> {
        let items = value
            .items
            .into_iter()
            .map(|item| {
                let product_id: ProductId = entity_id(&item.product, "product")?;
                CartItem::new(product_id, item.amount).map_err(order_error)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Checkout::new(items, value.tax, value.shipping_fee).map_err(order_error)
    }
}

/// Body of `PATCH /api/v1/orders/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    pub payment_intent_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrderResponse {
    pub order: Order,
    pub client_secret: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub order: Order,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
    pub count: usize,
}

impl From<Vec<Order>> for OrdersResponse {
    fn from(orders: Vec<Order>) -> Self {
        Self {
            count: orders.len(),
            orders,
        }
    }
}

/// Price the cart, open a payment intent and store a pending order.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Pending order", body = CreatedOrderResponse),
        (status = 400, description = "Invalid cart or charges", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 404, description = "Unknown product", body = Error)
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/orders")]
pub async fn create_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateOrderRequest>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let checkout = Checkout::try_from(payload.into_inner())?;
    let order = state.orders.create_order(&principal, checkout).await?;
    Ok(HttpResponse::Created().json(CreatedOrderResponse {
        client_secret: order.client_secret.clone(),
        order,
    }))
}

/// Every order. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    responses(
        (status = 200, description = "Orders", body = OrdersResponse),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<OrdersResponse>> {
    let principal = session.require_principal()?;
    let orders = state.orders.list_orders(&principal).await?;
    Ok(web::Json(orders.into()))
}

/// The caller's own orders.
#[utoipa::path(
    get,
    path = "/api/v1/orders/showAllMyOrders",
    responses(
        (status = 200, description = "Orders", body = OrdersResponse),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listMyOrders"
)]
#[get("/orders/showAllMyOrders")]
pub async fn list_my_orders(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<OrdersResponse>> {
    let principal = session.require_principal()?;
    let orders = state.orders.list_my_orders(&principal).await?;
    Ok(web::Json(orders.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order", body = OrderResponse),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/orders/{id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<OrderResponse>> {
    let principal = session.require_principal()?;
    let id: OrderId = entity_id(&path, "order")?;
    let order = state.orders.get_order(&principal, &id).await?;
    Ok(web::Json(OrderResponse { order }))
}

/// Record the confirmed payment intent and mark the order paid.
#[utoipa::path(
    patch,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order identifier")),
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Paid order", body = OrderResponse),
        (status = 400, description = "Missing payment intent", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["orders"],
    operation_id = "confirmPayment"
)]
#[patch("/orders/{id}")]
pub async fn confirm_payment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ConfirmPaymentRequest>,
) -> ApiResult<web::Json<OrderResponse>> {
    let principal = session.require_principal()?;
    let id: OrderId = entity_id(&path, "order")?;
    let order = state
        .orders
        .confirm_payment(&principal, &id, payload.into_inner().payment_intent_id)
        .await?;
    Ok(web::Json(OrderResponse { order }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{api_app, memory_state, session_cookie};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn register_request(name: &str, email: &str) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({"name": name, "email": email, "password": "secret1"}))
    }

    #[rstest]
    #[case(json!({"items": [], "tax": 499, "shippingFee": 799}), "No items in cart")]
    #[case(
        json!({"items": [{"product": "3fa85f64-5717-4562-b3fc-2c963f66afa6", "amount": 1}], "tax": 0, "shippingFee": 799}),
        "Please provide tax and shipping fee"
    )]
    #[case(
        json!({"items": [{"product": "3fa85f64-5717-4562-b3fc-2c963f66afa6", "amount": 1}], "shippingFee": 799}),
        "Please provide tax and shipping fee"
    )]
    fn checkout_validation_messages(#[case] payload: Value, #[case] message: &str) {
        let request: CreateOrderRequest = serde_json::from_value(payload).expect("request");
        let err = Checkout::try_from(request).expect_err("invalid checkout");
        assert_eq!(err.message(), message);
    }

    #[rstest]
    fn zero_amounts_are_rejected() {
        let request: CreateOrderRequest = serde_json::from_value(json!({
            "items": [{"product": "3fa85f64-5717-4562-b3fc-2c963f66afa6", "amount": 0}],
            "tax": 499,
            "shippingFee": 799
        }))
        .expect("request");
        let err = Checkout::try_from(request).expect_err("invalid amount");
        assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!("amount")));
    }

    #[rstest]
    #[actix_web::test]
    async fn checkout_then_payment_confirmation() {
        let app = actix_test::init_service(api_app(memory_state())).await;
        let admin = actix_test::call_service(&app, register_request("Ada", "ada@example.com").to_request())
            .await;
        let admin_cookie = session_cookie(&admin);
        let bob = actix_test::call_service(&app, register_request("Bob", "bob@example.com").to_request())
            .await;
        let bob_cookie = session_cookie(&bob);

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/products")
                .cookie(admin_cookie.clone())
                .set_json(json!({
                    "name": "accent chair",
                    "price": 2500,
                    "description": "Cloud bread VHS hell of banjo.",
                    "category": "office",
                    "company": "marcos"
                }))
                .to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(created).await;
        let product_id = body["product"]["id"].as_str().expect("product id").to_owned();

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/orders")
                .cookie(bob_cookie.clone())
                .set_json(json!({
                    "items": [{"product": product_id, "amount": 3}],
                    "tax": 499,
                    "shippingFee": 799
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["clientSecret"], "someRandomValue");
        assert_eq!(body["order"]["subtotal"], 7500);
        assert_eq!(body["order"]["total"], 8798);
        assert_eq!(body["order"]["status"], "pending");
        assert_eq!(body["order"]["orderItems"][0]["name"], "accent chair");
        let order_uri = format!(
            "/api/v1/orders/{}",
            body["order"]["id"].as_str().expect("order id")
        );

        let mine = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/orders/showAllMyOrders")
                .cookie(bob_cookie.clone())
                .to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(mine).await;
        assert_eq!(body["count"], 1);

        let forbidden = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/orders")
                .cookie(bob_cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let paid = actix_test::call_service(
            &app,
            actix_test::TestRequest::patch()
                .uri(&order_uri)
                .cookie(bob_cookie)
                .set_json(json!({"paymentIntentId": "pi_123"}))
                .to_request(),
        )
        .await;
        assert_eq!(paid.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(paid).await;
        assert_eq!(body["order"]["status"], "paid");
        assert_eq!(body["order"]["paymentIntentId"], "pi_123");

        let all = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/orders")
                .cookie(admin_cookie)
                .to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(all).await;
        assert_eq!(body["count"], 1);
    }

    #[rstest]
    #[actix_web::test]
    async fn orders_of_unknown_products_are_not_found() {
        let app = actix_test::init_service(api_app(memory_state())).await;
        let bob = actix_test::call_service(&app, register_request("Bob", "bob@example.com").to_request())
            .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/orders")
                .cookie(session_cookie(&bob))
                .set_json(json!({
                    "items": [{"product": "3fa85f64-5717-4562-b3fc-2c963f66afa6", "amount": 1}],
                    "tax": 499,
                    "shippingFee": 799
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
