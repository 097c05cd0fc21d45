//! Catalogue use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{ProductDetails, ProductRepository, ProductService, ReviewRepository};
use crate::domain::service_support::{map_product_repository_error, map_review_repository_error};
use crate::domain::{
    Error, Principal, Product, ProductDraft, ProductId, Review, Role, authorize_roles,
};

/// Product service implementing the [`ProductService`] driving port.
pub struct ProductServiceImpl<P, R> {
    products: Arc<P>,
    reviews: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<P, R> ProductServiceImpl<P, R>
where
    P: ProductRepository,
    R: ReviewRepository,
{
    pub fn new(products: Arc<P>, reviews: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            products,
            reviews,
            clock,
        }
    }

    async fn existing_product(&self, id: &ProductId) -> Result<Product, Error> {
        self.products
            .find_by_id(id)
            .await
            .map_err(map_product_repository_error)?
            .ok_or_else(|| Error::not_found(format!("No product with id {id}")))
    }
}

#[async_trait]
impl<P, R> ProductService for ProductServiceImpl<P, R>
where
    P: ProductRepository,
    R: ReviewRepository,
{
    async fn list_products(&self) -> Result<Vec<Product>, Error> {
        self.products
            .list()
            .await
            .map_err(map_product_repository_error)
    }

    async fn get_product(&self, id: &ProductId) -> Result<ProductDetails, Error> {
        let product = self.existing_product(id).await?;
        let reviews = self
            .reviews
            .list_for_product(id)
            .await
            .map_err(map_review_repository_error)?;
        Ok(ProductDetails { product, reviews })
    }

    async fn product_reviews(&self, id: &ProductId) -> Result<Vec<Review>, Error> {
        self.reviews
            .list_for_product(id)
            .await
            .map_err(map_review_repository_error)
    }

    async fn create_product(
        &self,
        principal: &Principal,
        draft: ProductDraft,
    ) -> Result<Product, Error> {
        authorize_roles(principal, &[Role::Admin])?;
        let product = Product::create(draft, principal.user_id, self.clock.utc());
        self.products
            .create(&product)
            .await
            .map_err(map_product_repository_error)?;
        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    async fn update_product(
        &self,
        principal: &Principal,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Product, Error> {
        authorize_roles(principal, &[Role::Admin])?;
        let mut product = self.existing_product(id).await?;
        product.apply(draft, self.clock.utc());
        let updated = self
            .products
            .update(&product)
            .await
            .map_err(map_product_repository_error)?;
        if !updated {
            return Err(Error::not_found(format!("No product with id {id}")));
        }
        Ok(product)
    }

    async fn delete_product(&self, principal: &Principal, id: &ProductId) -> Result<(), Error> {
        authorize_roles(principal, &[Role::Admin])?;
        self.existing_product(id).await?;
        let removed_reviews = self
            .reviews
            .delete_for_product(id)
            .await
            .map_err(map_review_repository_error)?;
        let deleted = self
            .products
            .delete(id)
            .await
            .map_err(map_product_repository_error)?;
        if !deleted {
            return Err(Error::not_found(format!("No product with id {id}")));
        }
        tracing::info!(product_id = %id, removed_reviews, "product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockProductRepository, MockReviewRepository};
    use crate::domain::{ErrorCode, ProductInput, ReviewContent, UserId};
    use mockable::DefaultClock;
    use mockall::Sequence;
    use mockall::predicate::eq;
    use rstest::rstest;

    fn make_service(
        products: MockProductRepository,
        reviews: MockReviewRepository,
    ) -> ProductServiceImpl<MockProductRepository, MockReviewRepository> {
        ProductServiceImpl::new(Arc::new(products), Arc::new(reviews), Arc::new(DefaultClock))
    }

    fn draft(name: &str) -> ProductDraft {
        ProductDraft::try_from(ProductInput {
            name: name.into(),
            price: Some(3_999),
            description: "Solid oak kitchen table.".into(),
            category: "kitchen".into(),
            company: "liddy".into(),
            ..ProductInput::default()
        })
        .expect("valid draft")
    }

    fn admin() -> Principal {
        Principal::new(UserId::random(), "Admin", Role::Admin)
    }

    #[rstest]
    #[tokio::test]
    async fn customers_cannot_create_products() {
        let mut products = MockProductRepository::new();
        products.expect_create().never();
        let customer = Principal::new(UserId::random(), "Customer", Role::User);

        let err = make_service(products, MockReviewRepository::new())
            .create_product(&customer, draft("oak table"))
            .await
            .expect_err("not an admin");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn created_products_start_with_an_empty_aggregate() {
        let mut products = MockProductRepository::new();
        products
            .expect_create()
            .withf(|product| product.average_rating == 0 && product.num_of_reviews == 0)
            .times(1)
            .return_once(|_| Ok(()));
        let principal = admin();

        let product = make_service(products, MockReviewRepository::new())
            .create_product(&principal, draft("oak table"))
            .await
            .expect("created");
        assert_eq!(product.user_id, principal.user_id);
    }

    #[rstest]
    #[tokio::test]
    async fn update_keeps_the_aggregate() {
        let mut existing = Product::create(draft("oak table"), UserId::random(), chrono::Utc::now());
        existing.average_rating = 3;
        existing.num_of_reviews = 9;
        let id = existing.id;
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        products
            .expect_update()
            .withf(|product| product.average_rating == 3 && product.num_of_reviews == 9)
            .return_once(|_| Ok(true));

        let updated = make_service(products, MockReviewRepository::new())
            .update_product(&admin(), &id, draft("pine table"))
            .await
            .expect("updated");
        assert_eq!(updated.name, "pine table");
    }

    #[rstest]
    #[tokio::test]
    async fn delete_removes_reviews_before_the_product() {
        let existing = Product::create(draft("oak table"), UserId::random(), chrono::Utc::now());
        let id = existing.id;
        let mut seq = Sequence::new();
        let mut products = MockProductRepository::new();
        let mut reviews = MockReviewRepository::new();
        products
            .expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(move |_| Ok(Some(existing)));
        reviews
            .expect_delete_for_product()
            .with(eq(id))
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_| Ok(2));
        products
            .expect_delete()
            .with(eq(id))
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_| Ok(true));

        make_service(products, reviews)
            .delete_product(&admin(), &id)
            .await
            .expect("deleted");
    }

    #[rstest]
    #[tokio::test]
    async fn details_embed_reviews() {
        let existing = Product::create(draft("oak table"), UserId::random(), chrono::Utc::now());
        let id = existing.id;
        let content = ReviewContent::try_from_parts(4, "Nice", "Good table").expect("valid");
        let review = Review::create(id, UserId::random(), content, chrono::Utc::now());
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_list_for_product()
            .with(eq(id))
            .return_once(move |_| Ok(vec![review]));

        let details = make_service(products, reviews)
            .get_product(&id)
            .await
            .expect("found");
        assert_eq!(details.reviews.len(), 1);
        assert_eq!(details.product.id, id);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_product_is_not_found() {
        let mut products = MockProductRepository::new();
        products.expect_find_by_id().return_once(|_| Ok(None));

        let err = make_service(products, MockReviewRepository::new())
            .get_product(&ProductId::random())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
