//! Orders and checkout arithmetic.
//!
//! Every amount is an integer in minor units; lines snapshot the product's
//! name, image and price at checkout so later catalogue edits do not rewrite
//! history.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::entity_id::entity_id;
use super::{OwnerRef, Product, ProductId, UserId};

entity_id! {
    /// Stable order identifier.
    OrderId
}

/// Currency used for payment intents.
pub const CURRENCY: &str = "usd";

/// Validation errors for checkout requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderValidationError {
    #[error("No items in cart")]
    EmptyCart,
    #[error("Please provide tax and shipping fee")]
    MissingCharges,
    #[error("amount must be at least 1")]
    InvalidAmount,
    #[error("order total is too large")]
    TotalOverflow,
    #[error("Please provide payment intent id")]
    MissingPaymentIntent,
    #[error("unknown order status: {value}")]
    UnknownStatus { value: String },
}

/// Lifecycle of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Failed,
    Paid,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Failed => "failed",
            Self::Paid => "paid",
            Self::Delivered => "delivered",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "failed" => Ok(Self::Failed),
            "paid" => Ok(Self::Paid),
            "delivered" => Ok(Self::Delivered),
            "canceled" => Ok(Self::Canceled),
            other => Err(OrderValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// One requested cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: ProductId,
    pub amount: u32,
}

impl CartItem {
    pub fn new(product_id: ProductId, amount: i64) -> Result<Self, OrderValidationError> {
        let amount = u32::try_from(amount)
            .ok()
            .filter(|amount| *amount >= 1)
            .ok_or(OrderValidationError::InvalidAmount)?;
        Ok(Self { product_id, amount })
    }
}

/// Validated checkout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub items: Vec<CartItem>,
    pub tax: i64,
    pub shipping_fee: i64,
}

impl Checkout {
    /// Both charges must be present and positive; the cart must not be empty.
    pub fn new(
        items: Vec<CartItem>,
        tax: Option<i64>,
        shipping_fee: Option<i64>,
    ) -> Result<Self, OrderValidationError> {
        if items.is_empty() {
            return Err(OrderValidationError::EmptyCart);
        }
        match (tax, shipping_fee) {
            (Some(tax), Some(shipping_fee)) if tax > 0 && shipping_fee > 0 => Ok(Self {
                items,
                tax,
                shipping_fee,
            }),
            _ => Err(OrderValidationError::MissingCharges),
        }
    }
}

/// Product snapshot captured on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub name: String,
    pub image: String,
    /// Unit price in minor units at checkout.
    pub price: i64,
    pub amount: u32,
    #[schema(value_type = String)]
    pub product: ProductId,
}

impl OrderLine {
    pub fn snapshot(product: &Product, amount: u32) -> Self {
        Self {
            name: product.name.clone(),
            image: product.image.clone(),
            price: product.price,
            amount,
            product: product.id,
        }
    }

    fn line_total(&self) -> Option<i64> {
        self.price.checked_mul(i64::from(self.amount))
    }
}

/// Priced order lines before a payment intent exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCart {
    pub lines: Vec<OrderLine>,
    pub tax: i64,
    pub shipping_fee: i64,
    pub subtotal: i64,
    pub total: i64,
}

impl PricedCart {
    /// Sum `amount × price` over the lines and add the charges.
    ///
    /// # Examples
    /// ```
    /// use storefront::domain::{OrderLine, PricedCart, ProductId};
    ///
    /// let line = OrderLine {
    ///     name: "chair".into(),
    ///     image: "/uploads/example.jpeg".into(),
    ///     price: 1_000,
    ///     amount: 3,
    ///     product: ProductId::random(),
    /// };
    /// let cart = PricedCart::price(vec![line], 499, 799).unwrap();
    /// assert_eq!(cart.subtotal, 3_000);
    /// assert_eq!(cart.total, 4_298);
    /// ```
    pub fn price(
        lines: Vec<OrderLine>,
        tax: i64,
        shipping_fee: i64,
    ) -> Result<Self, OrderValidationError> {
        let subtotal = lines.iter().try_fold(0_i64, |acc, line| {
            line.line_total().and_then(|total| acc.checked_add(total))
        });
        let subtotal = subtotal.ok_or(OrderValidationError::TotalOverflow)?;
        let total = tax
            .checked_add(shipping_fee)
            .and_then(|charges| charges.checked_add(subtotal))
            .ok_or(OrderValidationError::TotalOverflow)?;
        Ok(Self {
            lines,
            tax,
            shipping_fee,
            subtotal,
            total,
        })
    }
}

/// Stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[schema(value_type = String)]
    pub id: OrderId,
    #[schema(value_type = String)]
    #[serde(rename = "user")]
    pub user_id: UserId,
    #[serde(rename = "orderItems")]
    pub items: Vec<OrderLine>,
    pub tax: i64,
    pub shipping_fee: i64,
    pub subtotal: i64,
    pub total: i64,
    pub status: OrderStatus,
    pub client_secret: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// New pending order for `owner`.
    pub fn place(
        owner: UserId,
        cart: PricedCart,
        client_secret: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: OrderId::random(),
            user_id: owner,
            items: cart.lines,
            tax: cart.tax,
            shipping_fee: cart.shipping_fee,
            subtotal: cart.subtotal,
            total: cart.total,
            status: OrderStatus::Pending,
            client_secret,
            payment_intent_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record the confirmed payment intent.
    pub fn mark_paid(&mut self, payment_intent_id: String, now: DateTime<Utc>) {
        self.payment_intent_id = Some(payment_intent_id);
        self.status = OrderStatus::Paid;
        self.updated_at = now;
    }
}

impl OwnerRef for Order {
    fn owner_key(&self) -> String {
        self.user_id.owner_key()
    }
}
