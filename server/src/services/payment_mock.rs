// restoration-server/src/services/payment_mock.rs

use crate::errors::{AppError, Result as AppResult};
use crate::services::payment::{PaymentGateway, PaymentIntent, PaymentIntentRequest};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Stands in for the card processor: hands out `mock_pi_*` intents.
#[derive(Debug, Clone)]
pub struct MockPaymentGateway {
  account_id: String,
  latency: Duration,
}

impl MockPaymentGateway {
  pub fn new(account_id: impl Into<String>) -> Self {
    Self {
      account_id: account_id.into(),
      latency: Duration::ZERO,
    }
  }

  /// Simulated network latency per call.
  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = latency;
    self
  }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
  #[instrument(
    name = "MockPaymentGateway::create_intent",
    skip(self, request),
    fields(order_id = %request.order_id, amount = request.amount, currency = %request.currency, payment_account_id = %self.account_id)
  )]
  async fn create_intent(&self, request: PaymentIntentRequest) -> AppResult<PaymentIntent> {
    if request.amount == 0 {
      warn!("Refusing payment intent for a zero amount.");
      return Err(AppError::Payment("Amount must be greater than zero".to_string()));
    }
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }

    let id = format!("mock_pi_{}", Uuid::new_v4().simple());
    info!(payment_intent_id = %id, "Simulated payment intent created.");
    Ok(PaymentIntent {
      client_secret: format!("{}_secret_{}", id, Uuid::new_v4().simple()),
      id,
      amount: request.amount,
      currency: request.currency,
      status: "requires_payment_method".to_string(),
    })
  }
}
