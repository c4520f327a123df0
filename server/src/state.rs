// restoration-server/src/state.rs

use crate::config::AppConfig;
use crate::errors::Result as AppResult;
use crate::services::{MockPaymentGateway, PaymentGateway};
use restoration_core::{FileBinder, JsonFileStore, OrderError, OrderLifecycle};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
  pub lifecycle: OrderLifecycle,
  pub binder: Arc<FileBinder>,
  pub payments: Arc<dyn PaymentGateway>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Opens the orders and uploads directories named by `config` and wires the
  /// mock payment gateway.
  pub async fn from_config(config: AppConfig) -> AppResult<Self> {
    let payments = Arc::new(
      MockPaymentGateway::new(config.mock_payment_account_id.clone()).with_latency(config.mock_payment_latency),
    );
    Self::with_gateway(config, payments).await
  }

  pub async fn with_gateway(config: AppConfig, payments: Arc<dyn PaymentGateway>) -> AppResult<Self> {
    let store = JsonFileStore::open(&config.orders_dir).await.map_err(OrderError::from)?;
    let binder = FileBinder::new(config.upload_policy());
    binder.ensure_dir().await?;
    info!(
      orders_dir = %config.orders_dir.display(),
      upload_dir = %config.upload_dir.display(),
      "Order and upload directories ready."
    );

    Ok(Self {
      lifecycle: OrderLifecycle::new(Arc::new(store)),
      binder: Arc::new(binder),
      payments,
      config: Arc::new(config),
    })
  }
}
