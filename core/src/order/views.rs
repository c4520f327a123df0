// restoration-core/src/order/views.rs

//! Outward projections of an order. Neither exposes the storage path.

use super::{Order, OrderId, OrderRecord, OrderStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::ops::Deref;

/// Full order as returned to callers: the persisted record minus `file_path`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OrderView(OrderRecord);

impl From<&Order> for OrderView {
  fn from(order: &Order) -> Self {
    let mut record = OrderRecord::from(order);
    record.file_path = None;
    OrderView(record)
  }
}

impl Deref for OrderView {
  type Target = OrderRecord;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

/// Listing entry: identity, contact and progress only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
  pub order_id: OrderId,
  pub customer_email: String,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  pub file_uploaded: bool,
  pub payment_completed: bool,
}

impl From<&Order> for OrderSummary {
  fn from(order: &Order) -> Self {
    OrderSummary {
      order_id: order.order_id().clone(),
      customer_email: order.details.customer_email.clone(),
      status: order.status(),
      created_at: order.created_at(),
      file_uploaded: order.file_uploaded(),
      payment_completed: order.payment_completed(),
    }
  }
}
