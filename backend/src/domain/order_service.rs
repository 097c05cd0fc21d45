//! Checkout and order tracking use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{OrderRepository, OrderService, PaymentGateway, ProductRepository};
use crate::domain::service_support::{
    map_order_repository_error, map_payment_gateway_error, map_product_repository_error,
};
use crate::domain::{
    CURRENCY, Checkout, Error, Order, OrderId, OrderLine, OrderValidationError, Principal,
    PricedCart, Role, authorize_roles, check_permission,
};

/// Order service implementing the [`OrderService`] driving port.
pub struct OrderServiceImpl<O, P, G> {
    orders: Arc<O>,
    products: Arc<P>,
    payments: Arc<G>,
    clock: Arc<dyn Clock>,
}

impl<O, P, G> OrderServiceImpl<O, P, G>
where
    O: OrderRepository,
    P: ProductRepository,
    G: PaymentGateway,
{
    pub fn new(orders: Arc<O>, products: Arc<P>, payments: Arc<G>, clock: Arc<dyn Clock>) -> Self {
        Self {
            orders,
            products,
            payments,
            clock,
        }
    }

    async fn existing_order(&self, id: &OrderId) -> Result<Order, Error> {
        self.orders
            .find_by_id(id)
            .await
            .map_err(map_order_repository_error)?
            .ok_or_else(|| Error::not_found(format!("No order with id {id}")))
    }

    async fn price_cart(&self, checkout: Checkout) -> Result<PricedCart, Error> {
        let mut lines = Vec::with_capacity(checkout.items.len());
        for item in &checkout.items {
            let product = self
                .products
                .find_by_id(&item.product_id)
                .await
                .map_err(map_product_repository_error)?
                .ok_or_else(|| {
                    Error::not_found(format!("No product with id {}", item.product_id))
                })?;
            lines.push(OrderLine::snapshot(&product, item.amount));
        }
        PricedCart::price(lines, checkout.tax, checkout.shipping_fee)
            .map_err(|err| Error::bad_request(err.to_string()))
    }
}

#[async_trait]
impl<O, P, G> OrderService for OrderServiceImpl<O, P, G>
where
    O: OrderRepository,
    P: ProductRepository,
    G: PaymentGateway,
{
    async fn create_order(
        &self,
        principal: &Principal,
        checkout: Checkout,
    ) -> Result<Order, Error> {
        let cart = self.price_cart(checkout).await?;
        let intent = self
            .payments
            .create_payment_intent(cart.total, CURRENCY)
            .await
            .map_err(map_payment_gateway_error)?;
        let order = Order::place(
            principal.user_id,
            cart,
            intent.client_secret,
            self.clock.utc(),
        );
        self.orders
            .create(&order)
            .await
            .map_err(map_order_repository_error)?;
        tracing::info!(order_id = %order.id, total = order.total, "order placed");
        Ok(order)
    }

    async fn list_orders(&self, principal: &Principal) -> Result<Vec<Order>, Error> {
        authorize_roles(principal, &[Role::Admin])?;
        self.orders.list().await.map_err(map_order_repository_error)
    }

    async fn list_my_orders(&self, principal: &Principal) -> Result<Vec<Order>, Error> {
        self.orders
            .list_for_user(&principal.user_id)
            .await
            .map_err(map_order_repository_error)
    }

    async fn get_order(&self, principal: &Principal, id: &OrderId) -> Result<Order, Error> {
        let order = self.existing_order(id).await?;
        check_permission(principal, &order)?;
        Ok(order)
    }

    async fn confirm_payment(
        &self,
        principal: &Principal,
        id: &OrderId,
        payment_intent_id: String,
    ) -> Result<Order, Error> {
        if payment_intent_id.trim().is_empty() {
            return Err(Error::bad_request(
                OrderValidationError::MissingPaymentIntent.to_string(),
            ));
        }
        let mut order = self.existing_order(id).await?;
        check_permission(principal, &order)?;

        order.mark_paid(payment_intent_id, self.clock.utc());
        let updated = self
            .orders
            .update(&order)
            .await
            .map_err(map_order_repository_error)?;
        if !updated {
            return Err(Error::not_found(format!("No order with id {id}")));
        }
        tracing::info!(order_id = %id, "order paid");
        Ok(order)
    }
}
