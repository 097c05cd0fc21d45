//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::{HttpResponse, web};

use crate::domain::Error;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// Literal paths are registered before `{id}` paths that would shadow them.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        Error::bad_request(err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        Error::not_found(err.to_string()).into()
    }))
    .service(auth::register)
    .service(auth::login)
    .service(auth::logout)
    .service(users::list_users)
    .service(users::show_current_user)
    .service(users::update_user)
    .service(users::update_user_password)
    .service(users::get_user)
    .service(products::list_products)
    .service(products::create_product)
    .service(products::get_product_reviews)
    .service(products::get_product)
    .service(products::update_product)
    .service(products::delete_product)
    .service(reviews::list_reviews)
    .service(reviews::create_review)
    .service(reviews::get_review)
    .service(reviews::update_review)
    .service(reviews::delete_review)
    .service(orders::list_orders)
    .service(orders::create_order)
    .service(orders::list_my_orders)
    .service(orders::get_order)
    .service(orders::confirm_payment);
}

/// Fallback for unmatched routes.
pub async fn route_not_found() -> HttpResponse {
    actix_web::ResponseError::error_response(&Error::not_found("Route does not exist"))
}
