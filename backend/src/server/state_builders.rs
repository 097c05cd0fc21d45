//! Builders wiring repository adapters into the HTTP service bundle.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::warn;

use storefront::domain::ports::{
    OrderRepository, PasswordHasher, PaymentGateway, ProductRepository, ReviewRepository,
    UserRepository,
};
use storefront::domain::{
    AccountServiceImpl, OrderServiceImpl, ProductServiceImpl, ReviewServiceImpl,
};
use storefront::inbound::http::state::HttpState;
use storefront::outbound::memory::InMemoryStore;
use storefront::outbound::payment::FakePaymentGateway;
use storefront::outbound::persistence::{
    DbPool, DieselOrderRepository, DieselProductRepository, DieselReviewRepository,
    DieselUserRepository,
};
use storefront::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Driven adapters backing the services.
struct Adapters<U, P, R, O> {
    users: Arc<U>,
    products: Arc<P>,
    reviews: Arc<R>,
    orders: Arc<O>,
}

impl Adapters<DieselUserRepository, DieselProductRepository, DieselReviewRepository, DieselOrderRepository> {
    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            products: Arc::new(DieselProductRepository::new(pool.clone())),
            reviews: Arc::new(DieselReviewRepository::new(pool.clone())),
            orders: Arc::new(DieselOrderRepository::new(pool.clone())),
        }
    }
}

impl Adapters<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore> {
    fn memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: Arc::clone(&store),
            products: Arc::clone(&store),
            reviews: Arc::clone(&store),
            orders: store,
        }
    }
}

fn build_services<U, P, R, O, H, G>(
    adapters: Adapters<U, P, R, O>,
    hasher: Arc<H>,
    payments: Arc<G>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    R: ReviewRepository + 'static,
    O: OrderRepository + 'static,
    H: PasswordHasher + 'static,
    G: PaymentGateway + 'static,
{
    let Adapters {
        users,
        products,
        reviews,
        orders,
    } = adapters;
    HttpState::new(
        Arc::new(AccountServiceImpl::new(users, hasher, Arc::clone(&clock))),
        Arc::new(ProductServiceImpl::new(
            Arc::clone(&products),
            Arc::clone(&reviews),
            Arc::clone(&clock),
        )),
        Arc::new(ReviewServiceImpl::new(
            reviews,
            Arc::clone(&products),
            Arc::clone(&clock),
        )),
        Arc::new(OrderServiceImpl::new(orders, products, payments, clock)),
    )
}

/// Build the HTTP state from configuration.
///
/// PostgreSQL adapters are used when a pool is configured; otherwise every
/// repository lives in process memory and is lost on restart.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let payments = Arc::new(FakePaymentGateway);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let state = match &config.db_pool {
        Some(pool) => build_services(Adapters::diesel(pool), hasher, payments, clock),
        None => {
            warn!("no database configured; using the in-memory store");
            build_services(Adapters::memory(), hasher, payments, clock)
        }
    };
    web::Data::new(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::{Key, SameSite};
    use rstest::rstest;
    use storefront::domain::{ErrorCode, ProductId};

    #[rstest]
    #[tokio::test]
    async fn memory_state_serves_an_empty_catalogue() {
        let config = ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            "127.0.0.1:0".parse().expect("socket address"),
        );
        let state = build_http_state(&config);

        let products = state.products.list_products().await.expect("list");
        assert!(products.is_empty());
        let err = state
            .products
            .get_product(&ProductId::random())
            .await
            .expect_err("missing product");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn services_share_one_store() {
        use storefront::domain::{Registration, Role};

        let state = build_services(
            Adapters::memory(),
            Arc::new(storefront::domain::ports::FixturePasswordHasher),
            Arc::new(FakePaymentGateway),
            Arc::new(DefaultClock),
        );
        let admin = state
            .accounts
            .register(Registration::try_from_parts("Ada", "ada@example.com", "secret1").expect("valid"))
            .await
            .expect("register");
        assert_eq!(admin.role, Role::Admin);
        let users = state.accounts.list_users(&admin).await.expect("list users");
        assert!(users.is_empty());
    }
}
