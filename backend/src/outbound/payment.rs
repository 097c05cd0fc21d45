//! Stand-in payment provider.
//!
//! Accepts any positive amount and hands back a fixed client secret, which is
//! enough for clients to exercise the checkout flow without a real provider.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{PaymentGateway, PaymentGatewayError, PaymentIntent};

const FAKE_CLIENT_SECRET: &str = "someRandomValue";

/// [`PaymentGateway`] that never leaves the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakePaymentGateway;

#[async_trait]
impl PaymentGateway for FakePaymentGateway {
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentGatewayError> {
        if amount <= 0 {
            return Err(PaymentGatewayError::rejected(format!(
                "amount must be positive, got {amount}"
            )));
        }
        debug!(amount, currency, "issuing fake payment intent");
        Ok(PaymentIntent {
            client_secret: FAKE_CLIENT_SECRET.to_owned(),
            amount,
        })
    }
}
