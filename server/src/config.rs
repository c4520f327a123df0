// restoration-server/src/config.rs

use crate::errors::{AppError, Result};
use restoration_core::binder::{DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_UPLOAD_BYTES};
use restoration_core::UploadPolicy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,

  pub orders_dir: PathBuf,
  pub upload_dir: PathBuf,
  pub max_upload_bytes: u64,
  pub allowed_extensions: Vec<String>,

  // Mock payment gateway
  pub payment_currency: String,
  pub mock_payment_account_id: String,
  pub mock_payment_latency: Duration,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "0.0.0.0".to_string(),
      server_port: 5000,
      orders_dir: PathBuf::from("orders"),
      upload_dir: PathBuf::from("uploads"),
      max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
      allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
      payment_currency: "usd".to_string(),
      mock_payment_account_id: "mock_main_acct".to_string(),
      mock_payment_latency: Duration::ZERO,
    }
  }
}

impl AppConfig {
  /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up
  /// a `.env` file.
  pub fn from_env() -> Result<Self> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Builds the config from an arbitrary variable source; unset variables take
  /// their defaults.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let defaults = Self::default();
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let server_host = get("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = match get("SERVER_PORT").or_else(|| get("PORT")) {
      Some(raw) => raw
        .parse::<u16>()
        .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT '{}': {}", raw, e)))?,
      None => defaults.server_port,
    };

    let orders_dir = get("ORDERS_DIR").map(PathBuf::from).unwrap_or(defaults.orders_dir);
    let upload_dir = get("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir);

    let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
      Some(raw) => raw
        .parse::<u64>()
        .map_err(|e| AppError::Config(format!("Invalid MAX_UPLOAD_BYTES '{}': {}", raw, e)))?,
      None => defaults.max_upload_bytes,
    };

    let allowed_extensions = match get("ALLOWED_EXTENSIONS") {
      Some(raw) => {
        let list: Vec<String> = raw
          .split(',')
          .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
          .filter(|e| !e.is_empty())
          .collect();
        if list.is_empty() {
          return Err(AppError::Config("ALLOWED_EXTENSIONS lists no extensions".to_string()));
        }
        list
      }
      None => defaults.allowed_extensions,
    };

    let payment_currency = get("PAYMENT_CURRENCY")
      .map(|c| c.to_ascii_lowercase())
      .unwrap_or(defaults.payment_currency);
    let mock_payment_account_id = get("MOCK_PAYMENT_ACCOUNT_ID").unwrap_or(defaults.mock_payment_account_id);
    let mock_payment_latency = match get("MOCK_PAYMENT_LATENCY_MS") {
      Some(raw) => raw
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| AppError::Config(format!("Invalid MOCK_PAYMENT_LATENCY_MS '{}': {}", raw, e)))?,
      None => defaults.mock_payment_latency,
    };

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      orders_dir,
      upload_dir,
      max_upload_bytes,
      allowed_extensions,
      payment_currency,
      mock_payment_account_id,
      mock_payment_latency,
    })
  }

  pub fn upload_policy(&self) -> UploadPolicy {
    UploadPolicy::new(&self.upload_dir)
      .with_max_bytes(self.max_upload_bytes)
      .with_allowed_extensions(&self.allowed_extensions)
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
