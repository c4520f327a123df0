// restoration-server/src/services/payment.rs

use crate::errors::Result as AppResult;
use async_trait::async_trait;
use restoration_core::{Order, OrderId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Parameters for a new payment intent. `amount` is in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentRequest {
  pub order_id: OrderId,
  pub amount: u64,
  pub currency: String,
  pub metadata: BTreeMap<String, String>,
}

impl PaymentIntentRequest {
  pub fn for_order(order: &Order, currency: &str) -> Self {
    let metadata = BTreeMap::from([
      ("order_id".to_string(), order.order_id().to_string()),
      ("customer_email".to_string(), order.details.customer_email.clone()),
      ("service_type".to_string(), order.details.service_type.clone()),
    ]);
    Self {
      order_id: order.order_id().clone(),
      amount: order.amount_minor_units(),
      currency: currency.to_string(),
      metadata,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentIntent {
  pub id: String,
  pub client_secret: String,
  pub amount: u64,
  pub currency: String,
  pub status: String,
}

/// The card processor seam. Refusals are `AppError::Payment`.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
  async fn create_intent(&self, request: PaymentIntentRequest) -> AppResult<PaymentIntent>;
}
