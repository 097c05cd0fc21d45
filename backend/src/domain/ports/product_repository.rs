//! Port for catalogue persistence.
//!
//! The rating aggregate has its own write primitive so that only the
//! recomputation path ever touches it; [`ProductRepository::update`] leaves
//! those columns alone.

use async_trait::async_trait;

use crate::domain::{Product, ProductId, RatingSummary};

use super::define_port_error;

define_port_error! {
    /// Errors raised by product repository adapters.
    pub enum ProductRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "product repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "product repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every product, oldest first.
    async fn list(&self) -> Result<Vec<Product>, ProductRepositoryError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError>;

    async fn create(&self, product: &Product) -> Result<(), ProductRepositoryError>;

    /// Persist editable fields; `false` when the product does not exist.
    async fn update(&self, product: &Product) -> Result<bool, ProductRepositoryError>;

    /// Overwrite the derived rating columns; `false` when the product does
    /// not exist.
    async fn update_rating_summary(
        &self,
        id: &ProductId,
        summary: RatingSummary,
    ) -> Result<bool, ProductRepositoryError>;

    /// Remove a product; `false` when it did not exist.
    async fn delete(&self, id: &ProductId) -> Result<bool, ProductRepositoryError>;
}

/// Empty catalogue that discards writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProductRepository;

#[async_trait]
impl ProductRepository for FixtureProductRepository {
    async fn list(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        Ok(None)
    }

    async fn create(&self, _product: &Product) -> Result<(), ProductRepositoryError> {
        Ok(())
    }

    async fn update(&self, _product: &Product) -> Result<bool, ProductRepositoryError> {
        Ok(false)
    }

    async fn update_rating_summary(
        &self,
        _id: &ProductId,
        _summary: RatingSummary,
    ) -> Result<bool, ProductRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: &ProductId) -> Result<bool, ProductRepositoryError> {
        Ok(false)
    }
}
