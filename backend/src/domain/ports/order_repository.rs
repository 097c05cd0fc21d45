//! Port for order persistence.

use async_trait::async_trait;

use crate::domain::{Order, OrderId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "order repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Every order, oldest first.
    async fn list(&self) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Orders placed by one user, oldest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderRepositoryError>;

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError>;

    async fn create(&self, order: &Order) -> Result<(), OrderRepositoryError>;

    /// Persist status and payment fields; `false` when the order is gone.
    async fn update(&self, order: &Order) -> Result<bool, OrderRepositoryError>;
}

/// Repository with no orders that discards writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrderRepository;

#[async_trait]
impl OrderRepository for FixtureOrderRepository {
    async fn list(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(None)
    }

    async fn create(&self, _order: &Order) -> Result<(), OrderRepositoryError> {
        Ok(())
    }

    async fn update(&self, _order: &Order) -> Result<bool, OrderRepositoryError> {
        Ok(false)
    }
}
