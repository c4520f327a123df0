// tests/common/mod.rs
#![allow(dead_code)]

use restoration_core::flow::{Control, Ctx, Handler};
use restoration_core::{FileBinder, FlowError, JsonFileStore, NewOrder, OrderLifecycle, UploadPolicy};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::Level;

// --- Workflow test context ---
#[derive(Clone, Debug, Default)]
pub struct StepLog {
  pub steps_executed: Vec<String>,
  pub counter: i32,
  pub stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TestError {
  #[error("flow error: {0}")]
  Flow(#[from] FlowError),

  #[error("handler failed: {0}")]
  Handler(String),
}

pub fn recording_handler(step_name: &'static str) -> Handler<StepLog, TestError> {
  Box::new(move |ctx: Ctx<StepLog>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.steps_executed.push(step_name.to_string());
      if guard.stop_at.as_deref() == Some(step_name) {
        return Ok(Control::Stop);
      }
      Ok(Control::Continue)
    })
  })
}

pub fn failing_handler(step_name: &'static str, message: &'static str) -> Handler<StepLog, TestError> {
  Box::new(move |ctx: Ctx<StepLog>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(message.to_string()))
    })
  })
}

// --- Order fixtures ---
pub fn submission() -> NewOrder {
  NewOrder {
    customer_email: Some("a@b.com".to_string()),
    customer_name: Some("A".to_string()),
    service_type: Some("restore".to_string()),
    price: Some(50.0),
    rush_delivery: None,
  }
}

/// A lifecycle backed by a `JsonFileStore` in a fresh temp dir. Keep the
/// returned `TempDir` alive for the duration of the test.
pub async fn file_backed_lifecycle() -> (OrderLifecycle, TempDir) {
  let dir = TempDir::new().expect("temp dir");
  let store = JsonFileStore::open(dir.path().join("orders")).await.expect("open store");
  (OrderLifecycle::new(Arc::new(store)), dir)
}

pub fn binder_in(dir: &TempDir) -> FileBinder {
  FileBinder::new(UploadPolicy::new(dir.path().join("uploads")))
}

// --- Tracing ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
