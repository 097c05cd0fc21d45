//! Port for the payment provider.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment gateway adapters.
    pub enum PaymentGatewayError {
        /// The provider could not be reached.
        Unavailable { message: String } => "payment provider unavailable: {message}",
        /// The provider refused the request.
        Rejected { message: String } => "payment intent rejected: {message}",
    }
}

/// Intent returned by the provider for the client to confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub client_secret: String,
    /// Amount in minor units.
    pub amount: i64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a payment intent for `amount` minor units of `currency`.
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentGatewayError>;
}
