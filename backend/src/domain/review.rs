//! Product reviews.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::entity_id::entity_id;
use super::{OwnerRef, ProductId, UserId};

entity_id! {
    /// Stable review identifier.
    ReviewId
}

pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;
pub const TITLE_MAX: usize = 100;

/// Validation errors for review content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("rating must be between {min} and {max}")]
    RatingOutOfRange { min: u8, max: u8 },
    #[error("please provide title")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("please provide review text")]
    EmptyComment,
}

impl ReviewValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::RatingOutOfRange { .. } => "rating",
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyComment => "comment",
        }
    }
}

/// Star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Accept any integer and reject values outside the star range.
    pub fn new(value: i64) -> Result<Self, ReviewValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (RATING_MIN..=RATING_MAX).contains(v))
            .map(Self)
            .ok_or(ReviewValidationError::RatingOutOfRange {
                min: RATING_MIN,
                max: RATING_MAX,
            })
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Validated user-editable review content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewContent {
    pub rating: Rating,
    pub title: String,
    pub comment: String,
}

impl ReviewContent {
    /// Validate raw content; the title is trimmed before its length is checked.
    ///
    /// # Examples
    /// ```
    /// use storefront::domain::ReviewContent;
    ///
    /// let content = ReviewContent::try_from_parts(4, "  Sturdy  ", "Holds up well").unwrap();
    /// assert_eq!(content.title, "Sturdy");
    /// assert!(ReviewContent::try_from_parts(6, "Too good", "Off the chart").is_err());
    /// ```
    pub fn try_from_parts(
        rating: i64,
        title: &str,
        comment: &str,
    ) -> Result<Self, ReviewValidationError> {
        let rating = Rating::new(rating)?;
        let title = title.trim();
        if title.is_empty() {
            return Err(ReviewValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(ReviewValidationError::TitleTooLong { max: TITLE_MAX });
        }
        if comment.trim().is_empty() {
            return Err(ReviewValidationError::EmptyComment);
        }
        Ok(Self {
            rating,
            title: title.to_owned(),
            comment: comment.to_owned(),
        })
    }
}

/// A user's review of a product; at most one per `(product, user)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[schema(value_type = String)]
    pub id: ReviewId,
    #[schema(value_type = u8, minimum = 1, maximum = 5)]
    pub rating: Rating,
    pub title: String,
    pub comment: String,
    #[schema(value_type = String)]
    #[serde(rename = "user")]
    pub user_id: UserId,
    #[schema(value_type = String)]
    #[serde(rename = "product")]
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn create(
        product_id: ProductId,
        author: UserId,
        content: ReviewContent,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReviewId::random(),
            rating: content.rating,
            title: content.title,
            comment: content.comment,
            user_id: author,
            product_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, content: ReviewContent, now: DateTime<Utc>) {
        self.rating = content.rating;
        self.title = content.title;
        self.comment = content.comment;
        self.updated_at = now;
    }
}

impl OwnerRef for Review {
    fn owner_key(&self) -> String {
        self.user_id.owner_key()
    }
}
