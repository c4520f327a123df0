// restoration-core/src/lifecycle/contexts.rs

//! Context data the lifecycle workflows run on.

use crate::order::{CustomerDetails, FileMetadata, NewOrder, Order, OrderId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct CreateOrderCtx {
  pub submission: NewOrder,
  pub created_at: DateTime<Utc>,
  // Populated by the steps
  pub details: Option<CustomerDetails>,
  pub order_id: Option<OrderId>,
  pub order: Option<Order>,
}

impl CreateOrderCtx {
  pub fn new(submission: NewOrder) -> Self {
    Self {
      submission,
      created_at: Utc::now(),
      details: None,
      order_id: None,
      order: None,
    }
  }
}

/// A single change applied to an existing order.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderChange {
  AttachFile(FileMetadata),
  RecordPayment { payment_intent_id: Option<String> },
  AttachIntent { payment_intent_id: String },
}

impl OrderChange {
  pub fn name(&self) -> &'static str {
    match self {
      OrderChange::AttachFile(_) => "attach_file",
      OrderChange::RecordPayment { .. } => "record_payment",
      OrderChange::AttachIntent { .. } => "attach_intent",
    }
  }
}

#[derive(Debug, Clone)]
pub struct OrderMutationCtx {
  pub order_id: OrderId,
  pub change: OrderChange,
  pub at: DateTime<Utc>,
  pub order: Option<Order>,
  /// False when the change left the loaded order as it was.
  pub changed: bool,
}

impl OrderMutationCtx {
  pub fn new(order_id: OrderId, change: OrderChange) -> Self {
    Self {
      order_id,
      change,
      at: Utc::now(),
      order: None,
      changed: false,
    }
  }
}
