//! In-process storefront harness for HTTP integration suites.
//!
//! Wires the real services over the in-memory store and drives them through
//! the `/api/v1` routes with `actix_web::test`.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};

use storefront::Trace;
use storefront::domain::ports::FixturePasswordHasher;
use storefront::domain::{
    AccountServiceImpl, OrderServiceImpl, ProductServiceImpl, ReviewServiceImpl,
};
use storefront::inbound::http::state::HttpState;
use storefront::inbound::http::{configure, route_not_found};
use storefront::outbound::memory::InMemoryStore;
use storefront::outbound::payment::FakePaymentGateway;

/// Services over a fresh store.
pub fn memory_state() -> HttpState {
    let store = Arc::new(InMemoryStore::new());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    HttpState::new(
        Arc::new(AccountServiceImpl::new(
            Arc::clone(&store),
            Arc::new(FixturePasswordHasher),
            Arc::clone(&clock),
        )),
        Arc::new(ProductServiceImpl::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&clock),
        )),
        Arc::new(ReviewServiceImpl::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&clock),
        )),
        Arc::new(OrderServiceImpl::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::new(FakePaymentGateway),
            clock,
        )),
    )
}

/// The application as served in production, minus docs and metrics.
pub fn storefront_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(web::Data::new(memory_state()))
        .wrap(Trace)
        .service(web::scope("/api/v1").wrap(session).configure(configure))
        .default_service(web::to(route_not_found))
}

/// Outcome of one call: status, JSON body and the session cookie, if set.
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub cookie: Option<Cookie<'static>>,
}

/// Send `req` and collect the reply.
pub async fn send<S, B>(app: &S, req: test::TestRequest) -> Reply
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned);
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    Reply {
        status,
        body,
        cookie,
    }
}

/// Register an account and return its session cookie.
pub async fn sign_up<S, B>(app: &S, name: &str, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let reply = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({"name": name, "email": email, "password": "secret1"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    reply.cookie.expect("session cookie")
}

/// Create a product as `admin` and return its id.
pub async fn create_product<S, B>(app: &S, admin: &Cookie<'static>, name: &str, price: i64) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let reply = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/products")
            .cookie(admin.clone())
            .set_json(json!({
                "name": name,
                "price": price,
                "description": "Cloud bread VHS hell of banjo.",
                "category": "kitchen",
                "company": "ikea",
                "inventory": 20
            })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    reply.body["product"]["id"]
        .as_str()
        .expect("product id")
        .to_owned()
}
