//! Process-local implementation of every repository port.
//!
//! Backs the server when no database URL is configured and drives the
//! end-to-end HTTP tests. Mirrors the PostgreSQL constraints the domain
//! relies on: unique emails, one review per user and product, and review
//! removal when their product goes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    OrderRepository, OrderRepositoryError, ProductRepository, ProductRepositoryError,
    ReviewRepository, ReviewRepositoryError, StoredCredentials, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    EmailAddress, Order, OrderId, PasswordHash, Product, ProductId, RatingSummary, Review,
    ReviewId, Role, User, UserId, UserName,
};

#[derive(Default)]
struct State {
    users: Vec<(User, PasswordHash)>,
    products: Vec<Product>,
    reviews: Vec<Review>,
    orders: HashMap<OrderId, Order>,
}

/// Shared in-memory store. Clones see the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn newest_first(mut reviews: Vec<Review>) -> Vec<Review> {
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    reviews
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn count(&self) -> Result<u64, UserPersistenceError> {
        Ok(self.lock().users.len() as u64)
    }

    async fn create(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.lock();
        if state.users.iter().any(|(existing, _)| existing.email == user.email) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        state.users.push((user.clone(), password_hash.clone()));
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(user, _)| &user.id == id)
            .map(|(user, _)| user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(user, _)| user.email.as_ref() == email)
            .map(|(user, hash)| StoredCredentials {
                user: user.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn find_password_hash(
        &self,
        id: &UserId,
    ) -> Result<Option<PasswordHash>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(user, _)| &user.id == id)
            .map(|(_, hash)| hash.clone()))
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .filter(|(user, _)| user.role == role)
            .map(|(user, _)| user.clone())
            .collect())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        name: &UserName,
        email: &EmailAddress,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.lock();
        let taken = state
            .users
            .iter()
            .any(|(user, _)| &user.id != id && &user.email == email);
        if taken {
            return Err(UserPersistenceError::duplicate_email(email.as_ref()));
        }
        Ok(state
            .users
            .iter_mut()
            .find(|(user, _)| &user.id == id)
            .map(|(user, _)| {
                user.name = name.clone();
                user.email = email.clone();
                user.updated_at = updated_at;
                user.clone()
            }))
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &PasswordHash,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError> {
        let mut state = self.lock();
        let Some((user, hash)) = state.users.iter_mut().find(|(user, _)| &user.id == id) else {
            return Ok(false);
        };
        *hash = password_hash.clone();
        user.updated_at = updated_at;
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        Ok(self.lock().products.clone())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        Ok(self.lock().products.iter().find(|p| &p.id == id).cloned())
    }

    async fn create(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        self.lock().products.push(product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool, ProductRepositoryError> {
        let mut state = self.lock();
        let Some(stored) = state.products.iter_mut().find(|p| p.id == product.id) else {
            return Ok(false);
        };
        let summary = stored.rating_summary();
        *stored = product.clone();
        stored.average_rating = summary.average_rating;
        stored.num_of_reviews = summary.num_of_reviews;
        Ok(true)
    }

    async fn update_rating_summary(
        &self,
        id: &ProductId,
        summary: RatingSummary,
    ) -> Result<bool, ProductRepositoryError> {
        let mut state = self.lock();
        let Some(stored) = state.products.iter_mut().find(|p| &p.id == id) else {
            return Ok(false);
        };
        stored.average_rating = summary.average_rating;
        stored.num_of_reviews = summary.num_of_reviews;
        Ok(true)
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, ProductRepositoryError> {
        let mut state = self.lock();
        let before = state.products.len();
        state.products.retain(|p| &p.id != id);
        let removed = state.products.len() != before;
        if removed {
            state.reviews.retain(|r| &r.product_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Review>, ReviewRepositoryError> {
        Ok(newest_first(self.lock().reviews.clone()))
    }

    async fn list_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        let reviews = self
            .lock()
            .reviews
            .iter()
            .filter(|r| &r.product_id == product_id)
            .cloned()
            .collect();
        Ok(newest_first(reviews))
    }

    async fn ratings_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<u8>, ReviewRepositoryError> {
        Ok(self
            .lock()
            .reviews
            .iter()
            .filter(|r| &r.product_id == product_id)
            .map(|r| r.rating.value())
            .collect())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        Ok(self.lock().reviews.iter().find(|r| &r.id == id).cloned())
    }

    async fn find_by_product_and_user(
        &self,
        product_id: &ProductId,
        user_id: &UserId,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        Ok(self
            .lock()
            .reviews
            .iter()
            .find(|r| &r.product_id == product_id && &r.user_id == user_id)
            .cloned())
    }

    async fn create(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut state = self.lock();
        let duplicate = state
            .reviews
            .iter()
            .any(|r| r.product_id == review.product_id && r.user_id == review.user_id);
        if duplicate {
            return Err(ReviewRepositoryError::duplicate(
                review.product_id.to_string(),
                review.user_id.to_string(),
            ));
        }
        state.reviews.push(review.clone());
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<bool, ReviewRepositoryError> {
        let mut state = self.lock();
        let Some(stored) = state.reviews.iter_mut().find(|r| r.id == review.id) else {
            return Ok(false);
        };
        stored.rating = review.rating;
        stored.title = review.title.clone();
        stored.comment = review.comment.clone();
        stored.updated_at = review.updated_at;
        Ok(true)
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewRepositoryError> {
        let mut state = self.lock();
        let before = state.reviews.len();
        state.reviews.retain(|r| &r.id != id);
        Ok(state.reviews.len() != before)
    }

    async fn delete_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<u64, ReviewRepositoryError> {
        let mut state = self.lock();
        let before = state.reviews.len();
        state.reviews.retain(|r| &r.product_id != product_id);
        Ok((before - state.reviews.len()) as u64)
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut orders: Vec<Order> = self.lock().orders.values().cloned().collect();
        orders.sort_by_key(|order| order.created_at);
        Ok(orders)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut orders: Vec<Order> = self
            .lock()
            .orders
            .values()
            .filter(|order| &order.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by_key(|order| order.created_at);
        Ok(orders)
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(self.lock().orders.get(id).cloned())
    }

    async fn create(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        self.lock().orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<bool, OrderRepositoryError> {
        let mut state = self.lock();
        let Some(stored) = state.orders.get_mut(&order.id) else {
            return Ok(false);
        };
        stored.status = order.status;
        stored.payment_intent_id = order.payment_intent_id.clone();
        stored.updated_at = order.updated_at;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Company, ProductCategory, ProductDraft, ProductInput, ReviewContent,
    };
    use chrono::{Duration, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> InMemoryStore {
        InMemoryStore::new()
    }

    fn product() -> Product {
        let draft = ProductDraft::try_from(ProductInput {
            name: "Leather chair".into(),
            price: Some(12_999),
            description: "A comfortable leather chair".into(),
            category: ProductCategory::Office.as_str().into(),
            company: Company::Ikea.as_str().into(),
            ..ProductInput::default()
        })
        .expect("valid draft");
        Product::create(draft, UserId::random(), Utc::now())
    }

    fn review(product_id: ProductId, author: UserId, rating: i64, offset: i64) -> Review {
        let content = ReviewContent::try_from_parts(rating, "Solid", "Would buy again")
            .expect("valid content");
        Review::create(
            product_id,
            author,
            content,
            Utc::now() + Duration::seconds(offset),
        )
    }

    fn user(email: &str) -> User {
        let now = Utc::now();
        User {
            id: UserId::random(),
            name: UserName::new("shopper").expect("name"),
            email: EmailAddress::new(email).expect("email"),
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn second_review_by_the_same_author_is_a_duplicate(store: InMemoryStore) {
        let product = product();
        let author = UserId::random();
        ReviewRepository::create(&store, &review(product.id, author, 4, 0))
            .await
            .expect("first review");

        let err = ReviewRepository::create(&store, &review(product.id, author, 2, 1))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, ReviewRepositoryError::Duplicate { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn product_reviews_are_listed_newest_first(store: InMemoryStore) {
        let product = product();
        let older = review(product.id, UserId::random(), 3, 0);
        let newer = review(product.id, UserId::random(), 5, 10);
        ReviewRepository::create(&store, &older).await.expect("older");
        ReviewRepository::create(&store, &newer).await.expect("newer");

        let listed = store.list_for_product(&product.id).await.expect("list");
        let ids: Vec<ReviewId> = listed.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[rstest]
    #[tokio::test]
    async fn editing_a_product_keeps_its_rating_summary(store: InMemoryStore) {
        let mut product = product();
        ProductRepository::create(&store, &product).await.expect("create");
        store
            .update_rating_summary(
                &product.id,
                RatingSummary {
                    average_rating: 4,
                    num_of_reviews: 3,
                },
            )
            .await
            .expect("summary");

        product.name = "Renamed chair".into();
        assert!(ProductRepository::update(&store, &product).await.expect("update"));

        let stored = ProductRepository::find_by_id(&store, &product.id)
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.name, "Renamed chair");
        assert_eq!(stored.average_rating, 4);
        assert_eq!(stored.num_of_reviews, 3);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_a_product_drops_its_reviews(store: InMemoryStore) {
        let product = product();
        ProductRepository::create(&store, &product).await.expect("create");
        ReviewRepository::create(&store, &review(product.id, UserId::random(), 5, 0))
            .await
            .expect("review");

        assert!(ProductRepository::delete(&store, &product.id).await.expect("delete"));
        assert!(store
            .ratings_for_product(&product.id)
            .await
            .expect("ratings")
            .is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn summary_of_a_missing_product_reports_false(store: InMemoryStore) {
        let updated = store
            .update_rating_summary(&ProductId::random(), RatingSummary::default())
            .await
            .expect("no error");
        assert!(!updated);
    }

    #[rstest]
    #[tokio::test]
    async fn emails_are_unique(store: InMemoryStore) {
        let hash = PasswordHash::new("plain$secret");
        UserRepository::create(&store, &user("a@example.com"), &hash)
            .await
            .expect("first");
        let err = UserRepository::create(&store, &user("a@example.com"), &hash)
            .await
            .expect_err("duplicate");
        assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn account_writes_keep_the_supplied_timestamp(store: InMemoryStore) {
        let account = user("b@example.com");
        UserRepository::create(&store, &account, &PasswordHash::new("plain$secret"))
            .await
            .expect("create");
        let renamed_at = account.updated_at + Duration::days(3);
        let rehashed_at = renamed_at + Duration::hours(1);

        let renamed = store
            .update_profile(
                &account.id,
                &UserName::new("renamed").expect("name"),
                &account.email,
                renamed_at,
            )
            .await
            .expect("update")
            .expect("present");
        assert_eq!(renamed.updated_at, renamed_at);

        assert!(store
            .update_password_hash(&account.id, &PasswordHash::new("plain$other"), rehashed_at)
            .await
            .expect("rehash"));
        let stored = UserRepository::find_by_id(&store, &account.id)
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.updated_at, rehashed_at);
        assert_eq!(stored.created_at, account.created_at);
    }
}
