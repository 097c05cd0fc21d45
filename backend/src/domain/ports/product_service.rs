//! Driving port for catalogue use-cases.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, Principal, Product, ProductDraft, ProductId, Review};

/// Product with its reviews embedded, newest review first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    #[serde(flatten)]
    pub product: Product,
    pub reviews: Vec<Review>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, Error>;

    async fn get_product(&self, id: &ProductId) -> Result<ProductDetails, Error>;

    async fn product_reviews(&self, id: &ProductId) -> Result<Vec<Review>, Error>;

    /// Admin only.
    async fn create_product(
        &self,
        principal: &Principal,
        draft: ProductDraft,
    ) -> Result<Product, Error>;

    /// Admin only; the rating aggregate is left untouched.
    async fn update_product(
        &self,
        principal: &Principal,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Product, Error>;

    /// Admin only; removes the product's reviews first.
    async fn delete_product(&self, principal: &Principal, id: &ProductId) -> Result<(), Error>;
}
