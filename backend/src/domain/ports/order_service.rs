//! Driving port for checkout and order tracking.

use async_trait::async_trait;

use crate::domain::{Checkout, Error, Order, OrderId, Principal};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Price the cart, open a payment intent and store a pending order.
    async fn create_order(&self, principal: &Principal, checkout: Checkout)
    -> Result<Order, Error>;

    /// Admin only.
    async fn list_orders(&self, principal: &Principal) -> Result<Vec<Order>, Error>;

    async fn list_my_orders(&self, principal: &Principal) -> Result<Vec<Order>, Error>;

    /// Owner or admin.
    async fn get_order(&self, principal: &Principal, id: &OrderId) -> Result<Order, Error>;

    /// Owner or admin; marks the order paid.
    async fn confirm_payment(
        &self,
        principal: &Principal,
        id: &OrderId,
        payment_intent_id: String,
    ) -> Result<Order, Error>;
}
