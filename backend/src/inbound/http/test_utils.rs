//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::{Clock, DefaultClock};

use crate::domain::ports::FixturePasswordHasher;
use crate::domain::{AccountServiceImpl, OrderServiceImpl, ProductServiceImpl, ReviewServiceImpl};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{configure, route_not_found};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::payment::FakePaymentGateway;

/// Session middleware with a fresh key and the `Secure` flag off.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `response`; panics when absent.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Real services over a fresh in-memory store.
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

/// The full `/api/v1` application over `state`.
pub fn api_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .configure(configure),
        )
        .default_service(web::to(route_not_found))
}
