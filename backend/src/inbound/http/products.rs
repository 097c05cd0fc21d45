//! Catalogue handlers.
//!
//! Reads are public; writes are admin only.
//!
//! ```text
//! GET /api/v1/products
//! GET /api/v1/products/{id}
//! GET /api/v1/products/{id}/reviews
//! POST /api/v1/products {"name":"accent chair","price":25999,...}
//! PATCH /api/v1/products/{id}
//! DELETE /api/v1/products/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::ProductDetails;
use crate::domain::{Error, Product, ProductDraft, ProductId, ProductInput, Review};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::MessageResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{entity_id, product_error};

/// Product fields accepted by create and update.
///
/// Missing optional fields fall back to catalogue defaults.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductRequest {
    #[schema(example = "accent chair")]
    pub name: String,
    /// Price in minor units.
    pub price: Option<i64>,
    pub description: String,
    pub image: Option<String>,
    #[schema(example = "office")]
    pub category: String,
    #[schema(example = "marcos")]
    pub company: String,
    pub colors: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub free_shipping: Option<bool>,
    pub inventory: Option<i32>,
}

impl From<ProductRequest> for ProductInput {
    fn from(value: ProductRequest) -> Self {
        Self {
            name: value.name,
            price: value.price,
            description: value.description,
            image: value.image,
            category: value.category,
            company: value.company,
            colors: value.colors,
            featured: value.featured,
            free_shipping: value.free_shipping,
            inventory: value.inventory,
        }
    }
}

fn draft_from(payload: web::Json<ProductRequest>) -> Result<ProductDraft, Error> {
    ProductDraft::try_from(ProductInput::from(payload.into_inner())).map_err(product_error)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub product: Product,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetailsResponse {
    pub product: ProductDetails,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductReviewsResponse {
    pub reviews: Vec<Review>,
    pub count: usize,
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    responses(
        (status = 200, description = "Catalogue", body = ProductsResponse),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["products"],
    operation_id = "listProducts",
    security([])
)]
#[get("/products")]
pub async fn list_products(state: web::Data<HttpState>) -> ApiResult<web::Json<ProductsResponse>> {
    let products = state.products.list_products().await?;
    Ok(web::Json(ProductsResponse {
        count: products.len(),
        products,
    }))
}

/// One product with its reviews embedded, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Product", body = ProductDetailsResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "getProduct",
    security([])
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProductDetailsResponse>> {
    let id: ProductId = entity_id(&path, "product")?;
    let product = state.products.get_product(&id).await?;
    Ok(web::Json(ProductDetailsResponse { product }))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/reviews",
    params(("id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Reviews, newest first", body = ProductReviewsResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "getProductReviews",
    security([])
)]
#[get("/products/{id}/reviews")]
pub async fn get_product_reviews(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProductReviewsResponse>> {
    let id: ProductId = entity_id(&path, "product")?;
    let reviews = state.products.product_reviews(&id).await?;
    Ok(web::Json(ProductReviewsResponse {
        count: reviews.len(),
        reviews,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Created", body = ProductResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["products"],
    operation_id = "createProduct"
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProductRequest>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let draft = draft_from(payload)?;
    let product = state.products.create_product(&principal, draft).await?;
    Ok(HttpResponse::Created().json(ProductResponse { product }))
}

/// Replace the editable fields; the rating aggregate is left alone.
#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product identifier")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Updated", body = ProductResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "updateProduct"
)]
#[patch("/products/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ProductRequest>,
) -> ApiResult<web::Json<ProductResponse>> {
    let principal = session.require_principal()?;
    let id: ProductId = entity_id(&path, "product")?;
    let draft = draft_from(payload)?;
    let product = state.products.update_product(&principal, &id, draft).await?;
    Ok(web::Json(ProductResponse { product }))
}

/// Remove a product together with its reviews.
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Removed", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["products"],
    operation_id = "deleteProduct"
)]
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let principal = session.require_principal()?;
    let id: ProductId = entity_id(&path, "product")?;
    state.products.delete_product(&principal, &id).await?;
    Ok(web::Json(MessageResponse::new("Success! Product removed.")))
}
