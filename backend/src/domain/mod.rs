//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed storefront entities (accounts, products,
//! reviews, orders), the access rules over them, and the services that
//! orchestrate repository ports. Nothing here depends on actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - check_permission / authorize_roles: pure access decisions.
//! - RatingSummary / RatingAggregator: derived product rating maintenance.
//! - `*ServiceImpl`: implementations of the driving ports in [`ports`].

pub mod ports;

mod access;
mod account_service;
mod auth;
mod entity_id;
mod error;
mod order;
mod order_service;
mod product;
mod product_service;
mod rating_aggregator;
mod rating_summary;
mod review;
mod review_service;
mod service_support;
mod trace_id;
mod user;

pub use self::access::{OwnerRef, authorize_roles, check_permission};
pub use self::account_service::AccountServiceImpl;
pub use self::auth::{
    AuthValidationError, LoginCredentials, PASSWORD_MIN, Password, PasswordChange, PasswordHash,
    Principal, Registration,
};
pub use self::entity_id::InvalidEntityId;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::order::{
    CURRENCY, CartItem, Checkout, Order, OrderId, OrderLine, OrderStatus, OrderValidationError,
    PricedCart,
};
pub use self::order_service::OrderServiceImpl;
pub use self::product::{
    Company, DEFAULT_COLOR, DEFAULT_IMAGE, INVENTORY_MIN, Product, ProductCategory, ProductDraft,
    ProductId, ProductInput, ProductValidationError,
};
pub use self::product_service::ProductServiceImpl;
pub use self::rating_aggregator::{RatingAggregator, RefreshError};
pub use self::rating_summary::RatingSummary;
pub use self::review::{Rating, Review, ReviewContent, ReviewId, ReviewValidationError};
pub use self::review_service::ReviewServiceImpl;
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, Role, USER_NAME_MAX, USER_NAME_MIN, User, UserId, UserName, UserValidationError,
};
