//! Maintenance of the per-product rating aggregate.
//!
//! The aggregate is a materialised view over the review table. It is
//! recomputed from scratch after each review write, without locking, so two
//! concurrent writers may interleave; the last recompute to commit wins and
//! always reflects the table as it stood when it read.

use std::sync::Arc;

use crate::domain::ports::{
    ProductRepository, ProductRepositoryError, ReviewRepository, ReviewRepositoryError,
};
use crate::domain::{ProductId, RatingSummary};

/// Failure while recomputing; never surfaced past [`RatingAggregator::recompute_aggregate`].
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("failed to read ratings: {0}")]
    ReadRatings(#[from] ReviewRepositoryError),
    #[error("failed to store rating summary: {0}")]
    WriteSummary(#[from] ProductRepositoryError),
}

/// Recomputes a product's rating aggregate from its current reviews.
pub struct RatingAggregator<R, P> {
    reviews: Arc<R>,
    products: Arc<P>,
}

impl<R, P> Clone for RatingAggregator<R, P> {
    fn clone(&self) -> Self {
        Self {
            reviews: Arc::clone(&self.reviews),
            products: Arc::clone(&self.products),
        }
    }
}

impl<R, P> RatingAggregator<R, P>
where
    R: ReviewRepository,
    P: ProductRepository,
{
    pub fn new(reviews: Arc<R>, products: Arc<P>) -> Self {
        Self { reviews, products }
    }

    /// Best-effort recomputation.
    ///
    /// Errors are logged and swallowed so the review write that triggered the
    /// refresh still succeeds. A product that no longer exists is skipped.
    pub async fn recompute_aggregate(&self, product_id: &ProductId) {
        match self.try_recompute(product_id).await {
            Ok(Some(summary)) => tracing::debug!(
                %product_id,
                average_rating = summary.average_rating,
                num_of_reviews = summary.num_of_reviews,
                "rating summary refreshed"
            ),
            Ok(None) => tracing::debug!(%product_id, "rating summary skipped for missing product"),
            Err(error) => tracing::warn!(%product_id, %error, "rating summary refresh failed"),
        }
    }

    /// Recompute and persist, returning the stored summary or `None` when the
    /// product is missing.
    pub async fn try_recompute(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<RatingSummary>, RefreshError> {
        let ratings = self.reviews.ratings_for_product(product_id).await?;
        let summary = RatingSummary::from_ratings(ratings);
        let stored = self
            .products
            .update_rating_summary(product_id, summary)
            .await?;
        Ok(stored.then_some(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockProductRepository, MockReviewRepository};
    use mockall::predicate::{always, eq};
    use rstest::rstest;

    fn aggregator(
        reviews: MockReviewRepository,
        products: MockProductRepository,
    ) -> RatingAggregator<MockReviewRepository, MockProductRepository> {
        RatingAggregator::new(Arc::new(reviews), Arc::new(products))
    }

    #[rstest]
    #[case(vec![5, 4, 4, 3], 4, 4)]
    #[case(vec![5, 4], 5, 2)]
    #[case(vec![], 0, 0)]
    #[tokio::test]
    async fn stores_ceiling_mean_and_count(
        #[case] ratings: Vec<u8>,
        #[case] average: i32,
        #[case] count: i32,
    ) {
        let product_id = ProductId::random();
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_ratings_for_product()
            .with(eq(product_id))
            .times(1)
            .return_once(move |_| Ok(ratings));
        let expected = RatingSummary {
            average_rating: average,
            num_of_reviews: count,
        };
        let mut products = MockProductRepository::new();
        products
            .expect_update_rating_summary()
            .with(eq(product_id), eq(expected))
            .times(1)
            .return_once(|_, _| Ok(true));

        let stored = aggregator(reviews, products)
            .try_recompute(&product_id)
            .await
            .expect("refresh succeeds");
        assert_eq!(stored, Some(expected));
    }

    #[tokio::test]
    async fn missing_product_is_a_silent_no_op() {
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_ratings_for_product()
            .return_once(|_| Ok(Vec::new()));
        let mut products = MockProductRepository::new();
        products
            .expect_update_rating_summary()
            .with(always(), always())
            .return_once(|_, _| Ok(false));
        let aggregator = aggregator(reviews, products);

        let id = ProductId::random();
        assert_eq!(aggregator.try_recompute(&id).await.ok().flatten(), None);
    }

    #[tokio::test]
    async fn read_failures_skip_the_write_and_are_swallowed() {
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_ratings_for_product()
            .return_once(|_| Err(ReviewRepositoryError::connection("refused")));
        let mut products = MockProductRepository::new();
        products.expect_update_rating_summary().never();

        aggregator(reviews, products)
            .recompute_aggregate(&ProductId::random())
            .await;
    }

    #[tokio::test]
    async fn write_failures_are_reported_by_try_recompute() {
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_ratings_for_product()
            .return_once(|_| Ok(vec![3]));
        let mut products = MockProductRepository::new();
        products
            .expect_update_rating_summary()
            .times(1)
            .return_once(|_, _| Err(ProductRepositoryError::query("deadlock")));
        let aggregator = aggregator(reviews, products);

        let id = ProductId::random();
        assert!(matches!(
            aggregator.try_recompute(&id).await,
            Err(RefreshError::WriteSummary(_))
        ));
    }
}
