//! Derived rating aggregate for a product.

use serde::Serialize;
use utoipa::ToSchema;

/// Average rating and review count over a product's current reviews.
///
/// The average is the arithmetic mean rounded up to the next whole star.
///
/// # Examples
/// ```
/// use storefront::domain::RatingSummary;
///
/// let summary = RatingSummary::from_ratings([5, 4]);
/// assert_eq!(summary.average_rating, 5);
/// assert_eq!(summary.num_of_reviews, 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: i32,
    pub num_of_reviews: i32,
}

impl RatingSummary {
    /// Aggregate an arbitrary set of ratings; an empty set yields zeros.
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0_u64, 0_u64), |(sum, count), rating| {
                (sum + u64::from(rating), count + 1)
            });
        if count == 0 {
            return Self::default();
        }
        // Ratings are capped at five, so the mean always fits in an i32.
        let average = i32::try_from(sum.div_ceil(count)).unwrap_or(i32::MAX);
        let num_of_reviews = i32::try_from(count).unwrap_or(i32::MAX);
        Self {
            average_rating: average,
            num_of_reviews,
        }
    }
}
