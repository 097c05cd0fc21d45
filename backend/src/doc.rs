//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates every handler annotation together with the session
//! cookie security scheme. Swagger UI serves it at `/docs` in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::{auth, health, orders, products, reviews, users};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login or /api/v1/auth/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Storefront API",
        description = "Catalogue, reviews, checkout and account management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        auth::register,
        auth::login,
        auth::logout,
        users::list_users,
        users::show_current_user,
        users::update_user,
        users::update_user_password,
        users::get_user,
        products::list_products,
        products::get_product,
        products::get_product_reviews,
        products::create_product,
        products::update_product,
        products::delete_product,
        reviews::create_review,
        reviews::list_reviews,
        reviews::get_review,
        reviews::update_review,
        reviews::delete_review,
        orders::create_order,
        orders::list_orders,
        orders::list_my_orders,
        orders::get_order,
        orders::confirm_payment,
        health::ready,
        health::live,
    ),
    components(schemas(Error, ErrorCode)),
    tags(
        (name = "auth", description = "Registration and sessions"),
        (name = "users", description = "Account management"),
        (name = "products", description = "Catalogue"),
        (name = "reviews", description = "Product reviews and ratings"),
        (name = "orders", description = "Checkout and order tracking"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
