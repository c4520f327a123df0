// restoration-server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use restoration_core::OrderError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Payment Processing Error: {0}")]
  Payment(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),

  #[error("Order Error: {source}")]
  Core {
    #[from]
    source: OrderError,
  },
}

impl AppError {
  /// The message sent to the client. Server-side failures get a fixed text;
  /// their detail only goes to the log.
  fn public_message(&self) -> String {
    match self {
      AppError::Validation(m) | AppError::NotFound(m) | AppError::Payment(m) => m.clone(),
      AppError::Core { source } => match source {
        OrderError::Validation(m) => m.clone(),
        OrderError::OrderNotFound { .. } => "Order not found".to_string(),
        OrderError::FileNotFound { .. } => "File not found".to_string(),
        OrderError::InvalidType { .. } => "Invalid file type. Please upload an audio or video file.".to_string(),
        OrderError::TooLarge { limit } => format!("File size exceeds {} limit", human_size(*limit)),
        OrderError::Storage(_) | OrderError::Workflow(_) | OrderError::Internal(_) => {
          "An internal error occurred".to_string()
        }
      },
      AppError::Config(_) | AppError::Internal(_) => "An internal error occurred".to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Payment(_) => StatusCode::PAYMENT_REQUIRED,
      AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
      AppError::Core { source } => match source {
        OrderError::Validation(_) | OrderError::InvalidType { .. } | OrderError::TooLarge { .. } => {
          StatusCode::BAD_REQUEST
        }
        OrderError::OrderNotFound { .. } | OrderError::FileNotFound { .. } => StatusCode::NOT_FOUND,
        OrderError::Storage(_) | OrderError::Workflow(_) | OrderError::Internal(_) => {
          StatusCode::INTERNAL_SERVER_ERROR
        }
      },
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Rejecting request");
    }
    HttpResponse::build(status).json(json!({ "error": self.public_message() }))
  }
}

fn human_size(bytes: u64) -> String {
  const MB: u64 = 1024 * 1024;
  if bytes >= MB && bytes % MB == 0 {
    format!("{}MB", bytes / MB)
  } else {
    format!("{} bytes", bytes)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
