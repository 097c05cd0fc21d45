//! PostgreSQL-backed `ProductRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{Company, Product, ProductCategory, ProductId, RatingSummary, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ProductRow, ProductUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::products;

/// Diesel-backed implementation of the [`ProductRepository`] port.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProductRepositoryError {
    map_basic_pool_error(error, ProductRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ProductRepositoryError {
    map_basic_diesel_error(
        error,
        ProductRepositoryError::query,
        ProductRepositoryError::connection,
    )
}

fn row_to_product(row: ProductRow) -> Result<Product, ProductRepositoryError> {
    let category = row.category.parse::<ProductCategory>().map_err(|err| {
        ProductRepositoryError::query(format!("invalid category for product {}: {err}", row.id))
    })?;
    let company = row.company.parse::<Company>().map_err(|err| {
        ProductRepositoryError::query(format!("invalid company for product {}: {err}", row.id))
    })?;
    Ok(Product {
        id: ProductId::from_uuid(row.id),
        name: row.name,
        price: row.price,
        description: row.description,
        image: row.image,
        category,
        company,
        colors: row.colors,
        featured: row.featured,
        free_shipping: row.free_shipping,
        inventory: row.inventory,
        average_rating: row.average_rating,
        num_of_reviews: row.num_of_reviews,
        user_id: UserId::from_uuid(row.user_id),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn product_to_row(product: &Product) -> ProductRow {
    ProductRow {
        id: *product.id.as_uuid(),
        name: product.name.clone(),
        price: product.price,
        description: product.description.clone(),
        image: product.image.clone(),
        category: product.category.as_str().to_owned(),
        company: product.company.as_str().to_owned(),
        colors: product.colors.clone(),
        featured: product.featured,
        free_shipping: product.free_shipping,
        inventory: product.inventory,
        average_rating: product.average_rating,
        num_of_reviews: product.num_of_reviews,
        user_id: *product.user_id.as_uuid(),
        created_at: product.created_at,
        updated_at: product.updated_at,
    }
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn list(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProductRow> = products::table
            .order(products::created_at.asc())
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_product).collect()
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = products::table
            .find(id.as_uuid())
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_product).transpose()
    }

    async fn create(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(products::table)
            .values(&product_to_row(product))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ProductUpdate {
            name: &product.name,
            price: product.price,
            description: &product.description,
            image: &product.image,
            category: product.category.as_str(),
            company: product.company.as_str(),
            colors: &product.colors,
            featured: product.featured,
            free_shipping: product.free_shipping,
            inventory: product.inventory,
            updated_at: product.updated_at,
        };
        let updated = diesel::update(products::table.find(product.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn update_rating_summary(
        &self,
        id: &ProductId,
        summary: RatingSummary,
    ) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(products::table.find(id.as_uuid()))
            .set((
                products::average_rating.eq(summary.average_rating),
                products::num_of_reviews.eq(summary.num_of_reviews),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(products::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
