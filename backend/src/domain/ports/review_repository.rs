//! Port for review persistence.
//!
//! Adapters enforce the one-review-per-product-per-user constraint and report
//! violations as [`ReviewRepositoryError::Duplicate`].

use async_trait::async_trait;

use crate::domain::{ProductId, Review, ReviewId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
        /// The author already reviewed this product.
        Duplicate { product_id: String, user_id: String } =>
            "review already exists for product {product_id} by user {user_id}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Every review, newest first.
    async fn list(&self) -> Result<Vec<Review>, ReviewRepositoryError>;

    /// Reviews of one product, newest first.
    async fn list_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<Review>, ReviewRepositoryError>;

    /// Ratings of every review currently referencing the product.
    async fn ratings_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<u8>, ReviewRepositoryError>;

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError>;

    async fn find_by_product_and_user(
        &self,
        product_id: &ProductId,
        user_id: &UserId,
    ) -> Result<Option<Review>, ReviewRepositoryError>;

    async fn create(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    /// Persist rating, title and comment; `false` when the review is gone.
    async fn update(&self, review: &Review) -> Result<bool, ReviewRepositoryError>;

    /// Remove a review; `false` when it did not exist.
    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewRepositoryError>;

    /// Remove every review of a product, returning how many went.
    async fn delete_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<u64, ReviewRepositoryError>;
}

/// Repository with no reviews that discards writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReviewRepository;

#[async_trait]
impl ReviewRepository for FixtureReviewRepository {
    async fn list(&self) -> Result<Vec<Review>, ReviewRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_for_product(
        &self,
        _product_id: &ProductId,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        Ok(Vec::new())
    }

    async fn ratings_for_product(
        &self,
        _product_id: &ProductId,
    ) -> Result<Vec<u8>, ReviewRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        Ok(None)
    }

    async fn find_by_product_and_user(
        &self,
        _product_id: &ProductId,
        _user_id: &UserId,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        Ok(None)
    }

    async fn create(&self, _review: &Review) -> Result<(), ReviewRepositoryError> {
        Ok(())
    }

    async fn update(&self, _review: &Review) -> Result<bool, ReviewRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: &ReviewId) -> Result<bool, ReviewRepositoryError> {
        Ok(false)
    }

    async fn delete_for_product(
        &self,
        _product_id: &ProductId,
    ) -> Result<u64, ReviewRepositoryError> {
        Ok(0)
    }
}
