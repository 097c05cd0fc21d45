//! Port error translation shared by the domain services.

use crate::domain::Error;
use crate::domain::ports::{
    OrderRepositoryError, PasswordHashError, PaymentGatewayError, ProductRepositoryError,
    ReviewRepositoryError, UserPersistenceError,
};

pub(crate) const DUPLICATE_REVIEW_MESSAGE: &str =
    "You have already submitted a review for this product";

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::bad_request("Email already exists"),
    }
}

pub(crate) fn map_product_repository_error(error: ProductRepositoryError) -> Error {
    match error {
        ProductRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("product repository unavailable: {message}"))
        }
        ProductRepositoryError::Query { message } => {
            Error::internal(format!("product repository error: {message}"))
        }
    }
}

pub(crate) fn map_review_repository_error(error: ReviewRepositoryError) -> Error {
    match error {
        ReviewRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("review repository unavailable: {message}"))
        }
        ReviewRepositoryError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
        ReviewRepositoryError::Duplicate { .. } => Error::bad_request(DUPLICATE_REVIEW_MESSAGE),
    }
}

pub(crate) fn map_order_repository_error(error: OrderRepositoryError) -> Error {
    match error {
        OrderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("order repository unavailable: {message}"))
        }
        OrderRepositoryError::Query { message } => {
            Error::internal(format!("order repository error: {message}"))
        }
    }
}

pub(crate) fn map_password_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("password hashing failed: {error}"))
}

pub(crate) fn map_payment_gateway_error(error: PaymentGatewayError) -> Error {
    match error {
        PaymentGatewayError::Unavailable { message } => {
            Error::service_unavailable(format!("payment provider unavailable: {message}"))
        }
        PaymentGatewayError::Rejected { message } => {
            Error::bad_request(format!("payment could not be initiated: {message}"))
        }
    }
}
