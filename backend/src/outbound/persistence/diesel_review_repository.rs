//! PostgreSQL-backed `ReviewRepository` implementation using Diesel ORM.
//!
//! The `(product_id, user_id)` unique constraint backs the one-review rule;
//! its violations surface as [`ReviewRepositoryError::Duplicate`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{ProductId, Rating, Review, ReviewId, UserId};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{ReviewRow, ReviewUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::reviews;

/// Diesel-backed implementation of the [`ReviewRepository`] port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewRepositoryError {
    map_basic_pool_error(error, ReviewRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ReviewRepositoryError {
    map_basic_diesel_error(
        error,
        ReviewRepositoryError::query,
        ReviewRepositoryError::connection,
    )
}

fn row_to_review(row: ReviewRow) -> Result<Review, ReviewRepositoryError> {
    let rating = Rating::new(i64::from(row.rating)).map_err(|err| {
        ReviewRepositoryError::query(format!("invalid rating for review {}: {err}", row.id))
    })?;
    Ok(Review {
        id: ReviewId::from_uuid(row.id),
        rating,
        title: row.title,
        comment: row.comment,
        user_id: UserId::from_uuid(row.user_id),
        product_id: ProductId::from_uuid(row.product_id),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn rows_to_reviews(rows: Vec<ReviewRow>) -> Result<Vec<Review>, ReviewRepositoryError> {
    rows.into_iter().map(row_to_review).collect()
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn list(&self) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = reviews::table
            .order(reviews::created_at.desc())
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_reviews(rows)
    }

    async fn list_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = reviews::table
            .filter(reviews::product_id.eq(product_id.as_uuid()))
            .order(reviews::created_at.desc())
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_reviews(rows)
    }

    async fn ratings_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<u8>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ratings: Vec<i16> = reviews::table
            .filter(reviews::product_id.eq(product_id.as_uuid()))
            .select(reviews::rating)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        ratings
            .into_iter()
            .map(|rating| {
                u8::try_from(rating).map_err(|_| {
                    ReviewRepositoryError::query(format!("rating out of range: {rating}"))
                })
            })
            .collect()
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = reviews::table
            .find(id.as_uuid())
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_review).transpose()
    }

    async fn find_by_product_and_user(
        &self,
        product_id: &ProductId,
        user_id: &UserId,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = reviews::table
            .filter(reviews::product_id.eq(product_id.as_uuid()))
            .filter(reviews::user_id.eq(user_id.as_uuid()))
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_review).transpose()
    }

    async fn create(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = ReviewRow {
            id: *review.id.as_uuid(),
            rating: i16::from(review.rating.value()),
            title: review.title.clone(),
            comment: review.comment.clone(),
            user_id: *review.user_id.as_uuid(),
            product_id: *review.product_id.as_uuid(),
            created_at: review.created_at,
            updated_at: review.updated_at,
        };
        diesel::insert_into(reviews::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if unique_violation(&err).is_some() {
                    ReviewRepositoryError::duplicate(
                        review.product_id.to_string(),
                        review.user_id.to_string(),
                    )
                } else {
                    map_diesel_error(err)
                }
            })?;
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<bool, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ReviewUpdate {
            rating: i16::from(review.rating.value()),
            title: &review.title,
            comment: &review.comment,
            updated_at: review.updated_at,
        };
        let updated = diesel::update(reviews::table.find(review.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(reviews::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn delete_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<u64, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            reviews::table.filter(reviews::product_id.eq(product_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(u64::try_from(deleted).unwrap_or_default())
    }
}
