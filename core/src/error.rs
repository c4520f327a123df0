// restoration-core/src/error.rs

//! Error types for the workflow engine, the record store and the order lifecycle.

use thiserror::Error;

/// Failures raised by the workflow engine itself, independent of what handlers do.
#[derive(Debug, Error)]
pub enum FlowError {
  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("No workflow registered for context type {context_type}")]
  NotRegistered { context_type: String },

  #[error("Type mismatch during context dispatch (expected {expected_type})")]
  TypeMismatch { expected_type: String },
}

/// Failures reading or writing persisted order records.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("record store I/O failed: {0}")]
  Io(#[from] std::io::Error),

  #[error("order record could not be encoded or decoded: {0}")]
  Codec(#[from] serde_json::Error),
}

/// Everything an order operation can fail with.
///
/// The variants map one-to-one onto the outward error taxonomy: input problems,
/// unknown orders or files, rejected uploads, and storage failures.
#[derive(Debug, Error)]
pub enum OrderError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Order not found: {order_id}")]
  OrderNotFound { order_id: String },

  #[error("File not found: {file_id}")]
  FileNotFound { file_id: String },

  #[error("File type not allowed: {filename}")]
  InvalidType { filename: String },

  #[error("File exceeds the {limit} byte upload limit")]
  TooLarge { limit: u64 },

  #[error("Storage Error: {0}")]
  Storage(#[from] StoreError),

  #[error("Workflow Error: {0}")]
  Workflow(#[from] FlowError),

  #[error("Internal Error: {0}")]
  Internal(String),
}

impl OrderError {
  pub fn order_not_found(order_id: impl Into<String>) -> Self {
    OrderError::OrderNotFound {
      order_id: order_id.into(),
    }
  }
}

impl From<std::io::Error> for OrderError {
  fn from(err: std::io::Error) -> Self {
    OrderError::Storage(StoreError::Io(err))
  }
}

pub type OrderResult<T, E = OrderError> = std::result::Result<T, E>;
