// restoration-core/src/order/record.rs

//! The flat on-disk shape of an order (one JSON object per order).

use super::{CustomerDetails, FileAttachment, Order, OrderId, OrderStatus, PaymentRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
  pub order_id: OrderId,
  pub customer_email: String,
  pub customer_name: String,
  pub service_type: String,
  pub price: f64,
  #[serde(default)]
  pub rush_delivery: bool,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  #[serde(default)]
  pub file_uploaded: bool,
  #[serde(default)]
  pub payment_completed: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub file_path: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub original_filename: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub file_size: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub uploaded_at: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub payment_completed_at: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub payment_intent_id: Option<String>,
}

#[derive(Debug, Error)]
#[error("inconsistent record for order {order_id}: {reason}")]
pub struct InvalidRecord {
  pub order_id: OrderId,
  pub reason: &'static str,
}

impl From<&Order> for OrderRecord {
  fn from(order: &Order) -> Self {
    let attachment = order.attachment.as_ref();
    OrderRecord {
      order_id: order.order_id.clone(),
      customer_email: order.details.customer_email.clone(),
      customer_name: order.details.customer_name.clone(),
      service_type: order.details.service_type.clone(),
      price: order.details.price,
      rush_delivery: order.details.rush_delivery,
      status: order.status(),
      created_at: order.created_at,
      file_uploaded: order.file_uploaded(),
      payment_completed: order.payment_completed(),
      file_path: attachment.map(|a| a.stored_path.clone()),
      original_filename: attachment.map(|a| a.original_filename.clone()),
      file_size: attachment.map(|a| a.size),
      uploaded_at: attachment.map(|a| a.uploaded_at),
      payment_completed_at: order.payment.as_ref().map(|p| p.completed_at),
      payment_intent_id: order.payment_intent_id.clone(),
    }
  }
}

impl From<Order> for OrderRecord {
  fn from(order: Order) -> Self {
    OrderRecord::from(&order)
  }
}

impl TryFrom<OrderRecord> for Order {
  type Error = InvalidRecord;

  /// The stored `status` string is not trusted; it is re-derived from the flags.
  fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
    let invalid = |reason| InvalidRecord {
      order_id: record.order_id.clone(),
      reason,
    };

    let attachment = if record.file_uploaded {
      match (&record.file_path, &record.original_filename, record.file_size, record.uploaded_at) {
        (Some(path), Some(name), Some(size), Some(at)) => Some(FileAttachment {
          stored_path: path.clone(),
          original_filename: name.clone(),
          size,
          uploaded_at: at,
        }),
        _ => return Err(invalid("file_uploaded is set but file metadata is incomplete")),
      }
    } else {
      None
    };

    let payment = if record.payment_completed {
      match record.payment_completed_at {
        Some(completed_at) => Some(PaymentRecord { completed_at }),
        None => return Err(invalid("payment_completed is set without payment_completed_at")),
      }
    } else {
      None
    };

    Ok(Order {
      order_id: record.order_id,
      details: CustomerDetails {
        customer_email: record.customer_email,
        customer_name: record.customer_name,
        service_type: record.service_type,
        price: record.price,
        rush_delivery: record.rush_delivery,
      },
      created_at: record.created_at,
      attachment,
      payment,
      payment_intent_id: record.payment_intent_id,
    })
  }
}
