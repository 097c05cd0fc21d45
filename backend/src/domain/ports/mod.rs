//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Service`) are called by inbound adapters; driven ports
//! (repositories, hasher, payment gateway) are implemented by outbound
//! adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod order_repository;
mod order_service;
mod password_hasher;
mod payment_gateway;
mod product_repository;
mod product_service;
mod review_repository;
mod review_service;
mod user_repository;

#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::{AccountService, ProfileUpdate};
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{FixtureOrderRepository, OrderRepository, OrderRepositoryError};
#[cfg(test)]
pub use order_service::MockOrderService;
pub use order_service::OrderService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{PaymentGateway, PaymentGatewayError, PaymentIntent};
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{
    FixtureProductRepository, ProductRepository, ProductRepositoryError,
};
#[cfg(test)]
pub use product_service::MockProductService;
pub use product_service::{ProductDetails, ProductService};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{FixtureReviewRepository, ReviewRepository, ReviewRepositoryError};
#[cfg(test)]
pub use review_service::MockReviewService;
pub use review_service::ReviewService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    FixtureUserRepository, StoredCredentials, UserPersistenceError, UserRepository,
};
