//! Review handlers.
//!
//! Every write refreshes the reviewed product's rating aggregate before the
//! response is sent.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, ProductId, Review, ReviewContent, ReviewId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::MessageResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{entity_id, review_error};

/// Body of `POST /api/v1/reviews`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateReviewRequest {
    /// Identifier of the reviewed product.
    pub product: String,
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i64,
    pub title: String,
    pub comment: String,
}

/// Body of `PATCH /api/v1/reviews/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i64,
    pub title: String,
    pub comment: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub review: Review,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewsResponse {
    pub reviews: Vec<Review>,
    pub count: usize,
}

#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Created", body = ReviewResponse),
        (status = 400, description = "Invalid request or already reviewed", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateReviewRequest>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let CreateReviewRequest {
        product,
        rating,
        title,
        comment,
    } = payload.into_inner();
    let product_id: ProductId = entity_id(&product, "product")?;
    let content = ReviewContent::try_from_parts(rating, &title, &comment).map_err(review_error)?;
    let review = state
        .reviews
        .create_review(&principal, &product_id, content)
        .await?;
    Ok(HttpResponse::Created().json(ReviewResponse { review }))
}

/// All reviews, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    responses(
        (status = 200, description = "Reviews", body = ReviewsResponse),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "listReviews",
    security([])
)]
#[get("/reviews")]
pub async fn list_reviews(state: web::Data<HttpState>) -> ApiResult<web::Json<ReviewsResponse>> {
    let reviews = state.reviews.list_reviews().await?;
    Ok(web::Json(ReviewsResponse {
        count: reviews.len(),
        reviews,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/{id}",
    params(("id" = String, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "Review", body = ReviewResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "getReview",
    security([])
)]
#[get("/reviews/{id}")]
pub async fn get_review(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReviewResponse>> {
    let id: ReviewId = entity_id(&path, "review")?;
    let review = state.reviews.get_review(&id).await?;
    Ok(web::Json(ReviewResponse { review }))
}

#[utoipa::path(
    patch,
    path = "/api/v1/reviews/{id}",
    params(("id" = String, Path, description = "Review identifier")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Updated", body = ReviewResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "updateReview"
)]
#[patch("/reviews/{id}")]
pub async fn update_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateReviewRequest>,
) -> ApiResult<web::Json<ReviewResponse>> {
    let principal = session.require_principal()?;
    let id: ReviewId = entity_id(&path, "review")?;
    let content = ReviewContent::try_from_parts(payload.rating, &payload.title, &payload.comment)
        .map_err(review_error)?;
    let review = state.reviews.update_review(&principal, &id, content).await?;
    Ok(web::Json(ReviewResponse { review }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    params(("id" = String, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "Removed", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview"
)]
#[delete("/reviews/{id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let principal = session.require_principal()?;
    let id: ReviewId = entity_id(&path, "review")?;
    state.reviews.delete_review(&principal, &id).await?;
    Ok(web::Json(MessageResponse::new("Success! Review removed")))
}
