//! Review use-cases with explicit aggregate maintenance.
//!
//! Each mutation is two sequential steps: the review write, then
//! [`RatingAggregator::recompute_aggregate`] for the affected product. The refresh runs
//! only after the write has succeeded and cannot fail the operation.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{ProductRepository, ReviewRepository, ReviewService};
use crate::domain::service_support::{
    DUPLICATE_REVIEW_MESSAGE, map_product_repository_error, map_review_repository_error,
};
use crate::domain::{
    Error, Principal, ProductId, RatingAggregator, Review, ReviewContent, ReviewId,
    check_permission,
};

/// Review service implementing the [`ReviewService`] driving port.
pub struct ReviewServiceImpl<R, P> {
    reviews: Arc<R>,
    products: Arc<P>,
    aggregator: RatingAggregator<R, P>,
    clock: Arc<dyn Clock>,
}

impl<R, P> ReviewServiceImpl<R, P>
where
    R: ReviewRepository,
    P: ProductRepository,
{
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use storefront::domain::ReviewServiceImpl;
    /// # use storefront::domain::ports::{FixtureProductRepository, FixtureReviewRepository};
    /// let service = ReviewServiceImpl::new(
    ///     Arc::new(FixtureReviewRepository),
    ///     Arc::new(FixtureProductRepository),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(reviews: Arc<R>, products: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        let aggregator = RatingAggregator::new(Arc::clone(&reviews), Arc::clone(&products));
        Self {
            reviews,
            products,
            aggregator,
            clock,
        }
    }

    async fn existing_review(&self, id: &ReviewId) -> Result<Review, Error> {
        self.reviews
            .find_by_id(id)
            .await
            .map_err(map_review_repository_error)?
            .ok_or_else(|| Error::not_found(format!("No review with id {id}")))
    }
}

#[async_trait]
impl<R, P> ReviewService for ReviewServiceImpl<R, P>
where
    R: ReviewRepository,
    P: ProductRepository,
{
    async fn create_review(
        &self,
        principal: &Principal,
        product_id: &ProductId,
        content: ReviewContent,
    ) -> Result<Review, Error> {
        self.products
            .find_by_id(product_id)
            .await
            .map_err(map_product_repository_error)?
            .ok_or_else(|| Error::not_found(format!("No product with id {product_id}")))?;

        let existing = self
            .reviews
            .find_by_product_and_user(product_id, &principal.user_id)
            .await
            .map_err(map_review_repository_error)?;
        if existing.is_some() {
            return Err(Error::bad_request(DUPLICATE_REVIEW_MESSAGE));
        }

        let review = Review::create(*product_id, principal.user_id, content, self.clock.utc());
        self.reviews
            .create(&review)
            .await
            .map_err(map_review_repository_error)?;
        tracing::info!(review_id = %review.id, %product_id, "review created");

        self.aggregator.recompute_aggregate(product_id).await;
        Ok(review)
    }

    async fn list_reviews(&self) -> Result<Vec<Review>, Error> {
        self.reviews
            .list()
            .await
            .map_err(map_review_repository_error)
    }

    async fn get_review(&self, id: &ReviewId) -> Result<Review, Error> {
        self.existing_review(id).await
    }

    async fn update_review(
        &self,
        principal: &Principal,
        id: &ReviewId,
        content: ReviewContent,
    ) -> Result<Review, Error> {
        let mut review = self.existing_review(id).await?;
        check_permission(principal, &review)?;

        review.apply(content, self.clock.utc());
        let updated = self
            .reviews
            .update(&review)
            .await
            .map_err(map_review_repository_error)?;
        if !updated {
            return Err(Error::not_found(format!("No review with id {id}")));
        }

        self.aggregator.recompute_aggregate(&review.product_id).await;
        Ok(review)
    }

    async fn delete_review(&self, principal: &Principal, id: &ReviewId) -> Result<(), Error> {
        let review = self.existing_review(id).await?;
        check_permission(principal, &review)?;

        let product_id = review.product_id;
        let deleted = self
            .reviews
            .delete(id)
            .await
            .map_err(map_review_repository_error)?;
        if !deleted {
            return Err(Error::not_found(format!("No review with id {id}")));
        }
        tracing::info!(review_id = %id, %product_id, "review deleted");

        self.aggregator.recompute_aggregate(&product_id).await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "review_service_tests.rs"]
mod tests;
