// restoration-core/src/order/mod.rs

//! The order model.
//!
//! Progress is tracked along two independent dimensions, an optional file
//! attachment and an optional payment record. The status string is derived from
//! them, so it can only move forward.

pub mod id;
pub mod record;
pub mod views;

pub use id::{MalformedOrderId, OrderId};
pub use record::{InvalidRecord, OrderRecord};
pub use views::{OrderSummary, OrderView};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
  PendingPayment,
  FileUploaded,
  Paid,
}

impl OrderStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      OrderStatus::PendingPayment => "pending_payment",
      OrderStatus::FileUploaded => "file_uploaded",
      OrderStatus::Paid => "paid",
    }
  }
}

impl std::fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Submission payload for a new order. Every field except `rush_delivery` is
/// required; absence is reported by the lifecycle, not by deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewOrder {
  pub customer_email: Option<String>,
  pub customer_name: Option<String>,
  pub service_type: Option<String>,
  pub price: Option<f64>,
  #[serde(default)]
  pub rush_delivery: Option<bool>,
}

/// Metadata of a stored upload, as handed to the lifecycle for binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
  pub stored_path: String,
  pub original_filename: String,
  pub size: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileAttachment {
  pub stored_path: String,
  pub original_filename: String,
  pub size: u64,
  pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
  pub completed_at: DateTime<Utc>,
}

/// Validated customer fields of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDetails {
  pub customer_email: String,
  pub customer_name: String,
  pub service_type: String,
  pub price: f64,
  pub rush_delivery: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "OrderRecord", try_from = "OrderRecord")]
pub struct Order {
  order_id: OrderId,
  pub details: CustomerDetails,
  created_at: DateTime<Utc>,
  attachment: Option<FileAttachment>,
  payment: Option<PaymentRecord>,
  payment_intent_id: Option<String>,
}

impl Order {
  pub fn new(order_id: OrderId, details: CustomerDetails, created_at: DateTime<Utc>) -> Self {
    Self {
      order_id,
      details,
      created_at,
      attachment: None,
      payment: None,
      payment_intent_id: None,
    }
  }

  pub fn order_id(&self) -> &OrderId {
    &self.order_id
  }

  pub fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }

  pub fn attachment(&self) -> Option<&FileAttachment> {
    self.attachment.as_ref()
  }

  pub fn payment(&self) -> Option<&PaymentRecord> {
    self.payment.as_ref()
  }

  pub fn payment_intent_id(&self) -> Option<&str> {
    self.payment_intent_id.as_deref()
  }

  pub fn file_uploaded(&self) -> bool {
    self.attachment.is_some()
  }

  pub fn payment_completed(&self) -> bool {
    self.payment.is_some()
  }

  pub fn status(&self) -> OrderStatus {
    match (&self.payment, &self.attachment) {
      (Some(_), _) => OrderStatus::Paid,
      (None, Some(_)) => OrderStatus::FileUploaded,
      (None, None) => OrderStatus::PendingPayment,
    }
  }

  /// Binds an uploaded file. A later upload replaces the earlier attachment.
  pub fn attach_file(&mut self, file: FileMetadata, at: DateTime<Utc>) {
    self.attachment = Some(FileAttachment {
      stored_path: file.stored_path,
      original_filename: file.original_filename,
      size: file.size,
      uploaded_at: at,
    });
  }

  /// Marks the order paid. Repeating it refreshes the timestamp; an intent
  /// reference recorded earlier is kept when none is supplied.
  pub fn record_payment(&mut self, payment_intent_id: Option<String>, at: DateTime<Utc>) {
    if payment_intent_id.is_some() {
      self.payment_intent_id = payment_intent_id;
    }
    self.payment = Some(PaymentRecord { completed_at: at });
  }

  /// Stores the processor's intent reference. Returns false when it was
  /// already recorded.
  pub fn set_payment_intent(&mut self, payment_intent_id: String) -> bool {
    if self.payment_intent_id.as_deref() == Some(payment_intent_id.as_str()) {
      return false;
    }
    self.payment_intent_id = Some(payment_intent_id);
    true
  }

  /// Amount to charge in minor currency units.
  pub fn amount_minor_units(&self) -> u64 {
    (self.details.price * 100.0).round().max(0.0) as u64
  }

  pub fn view(&self) -> OrderView {
    OrderView::from(self)
  }

  pub fn summary(&self) -> OrderSummary {
    OrderSummary::from(self)
  }
}
