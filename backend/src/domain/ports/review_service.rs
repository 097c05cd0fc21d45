//! Driving port for review use-cases.
//!
//! Every successful create, update and delete refreshes the parent product's
//! rating aggregate before returning.

use async_trait::async_trait;

use crate::domain::{Error, Principal, ProductId, Review, ReviewContent, ReviewId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// One review per product per user.
    async fn create_review(
        &self,
        principal: &Principal,
        product_id: &ProductId,
        content: ReviewContent,
    ) -> Result<Review, Error>;

    async fn list_reviews(&self) -> Result<Vec<Review>, Error>;

    async fn get_review(&self, id: &ReviewId) -> Result<Review, Error>;

    /// Owner or admin.
    async fn update_review(
        &self,
        principal: &Principal,
        id: &ReviewId,
        content: ReviewContent,
    ) -> Result<Review, Error>;

    /// Owner or admin.
    async fn delete_review(&self, principal: &Principal, id: &ReviewId) -> Result<(), Error>;
}
