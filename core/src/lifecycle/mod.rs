// restoration-core/src/lifecycle/mod.rs

//! The Order Lifecycle Manager.
//!
//! Every operation runs a registered workflow over the record store. Mutations
//! of one order are serialized by a per-order lock within the process; across
//! processes the last write wins.

pub mod contexts;
pub mod locks;
pub mod workflows;

pub use contexts::{CreateOrderCtx, OrderChange, OrderMutationCtx};
pub use locks::OrderLocks;

use crate::error::{OrderError, OrderResult};
use crate::flow::{Ctx, Outcome, WorkflowRegistry};
use crate::order::{FileMetadata, NewOrder, Order, OrderId, OrderSummary, OrderView};
use crate::store::RecordStore;
use std::sync::Arc;
use tracing::{instrument, warn};

#[derive(Clone)]
pub struct OrderLifecycle {
  store: Arc<dyn RecordStore>,
  workflows: Arc<WorkflowRegistry<OrderError>>,
  locks: Arc<OrderLocks>,
}

impl std::fmt::Debug for OrderLifecycle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OrderLifecycle")
      .field("locked_orders", &self.locks.tracked())
      .finish_non_exhaustive()
  }
}

impl OrderLifecycle {
  pub fn new(store: Arc<dyn RecordStore>) -> Self {
    let registry = WorkflowRegistry::new();
    workflows::register_lifecycle_workflows(&registry, &store);
    Self {
      store,
      workflows: Arc::new(registry),
      locks: Arc::new(OrderLocks::new()),
    }
  }

  /// Validates `submission` and persists a new order in `pending_payment`.
  #[instrument(name = "OrderLifecycle::create_order", skip_all, err(Display))]
  pub async fn create_order(&self, submission: NewOrder) -> OrderResult<Order> {
    let ctx = Ctx::new(CreateOrderCtx::new(submission));
    let outcome = self.workflows.run(ctx.clone()).await?;
    let order = ctx.write().order.take();
    match (outcome, order) {
      (Outcome::Completed, Some(order)) => Ok(order),
      _ => Err(OrderError::Internal("order creation did not complete".to_string())),
    }
  }

  /// Binds stored file metadata to the order. A later upload replaces the
  /// earlier attachment.
  #[instrument(name = "OrderLifecycle::mark_file_uploaded", skip(self, file), err(Display))]
  pub async fn mark_file_uploaded(&self, order_id: &str, file: FileMetadata) -> OrderResult<Order> {
    self.mutate(order_id, OrderChange::AttachFile(file)).await
  }

  /// Records completed payment. Calling it again refreshes the timestamp.
  #[instrument(name = "OrderLifecycle::mark_paid", skip(self), err(Display))]
  pub async fn mark_paid(&self, order_id: &str, payment_intent_id: Option<String>) -> OrderResult<Order> {
    self
      .mutate(order_id, OrderChange::RecordPayment { payment_intent_id })
      .await
  }

  /// Records the processor's intent reference without marking the order paid.
  #[instrument(name = "OrderLifecycle::attach_payment_intent", skip(self), err(Display))]
  pub async fn attach_payment_intent(&self, order_id: &str, payment_intent_id: String) -> OrderResult<Order> {
    self
      .mutate(order_id, OrderChange::AttachIntent { payment_intent_id })
      .await
  }

  pub async fn get_order(&self, order_id: &str) -> OrderResult<OrderView> {
    Ok(self.find_order(order_id).await?.view())
  }

  /// The full order, storage path included. Not for outward responses.
  pub async fn find_order(&self, order_id: &str) -> OrderResult<Order> {
    let Some(id) = parse_known_shape(order_id) else {
      return Err(OrderError::order_not_found(order_id));
    };
    self
      .store
      .load(&id)
      .await?
      .ok_or_else(|| OrderError::order_not_found(order_id))
  }

  /// Summaries of every persisted order. Records that fail to load are left out.
  #[instrument(name = "OrderLifecycle::list_orders", skip(self), err(Display))]
  pub async fn list_orders(&self) -> OrderResult<Vec<OrderSummary>> {
    let ids = self.store.list().await?;
    let mut summaries = Vec::with_capacity(ids.len());
    for id in ids {
      match self.store.load(&id).await {
        Ok(Some(order)) => summaries.push(order.summary()),
        Ok(None) => warn!(order_id = %id, "Order disappeared while listing."),
        Err(e) => warn!(order_id = %id, error = %e, "Skipping unreadable order record."),
      }
    }
    Ok(summaries)
  }

  async fn mutate(&self, order_id: &str, change: OrderChange) -> OrderResult<Order> {
    let Some(id) = parse_known_shape(order_id) else {
      return Err(OrderError::order_not_found(order_id));
    };

    let _guard = self.locks.acquire(&id).await;
    let ctx = Ctx::new(OrderMutationCtx::new(id, change));
    self.workflows.run(ctx.clone()).await?;

    // A stopped run means nothing changed; the loaded order is current.
    let order = ctx.write().order.take();
    order.ok_or_else(|| OrderError::Internal("order was not loaded".to_string()))
  }
}

/// IDs that are not `WAR-XXXXXXXX` cannot name a stored order.
fn parse_known_shape(order_id: &str) -> Option<OrderId> {
  OrderId::parse(order_id).ok()
}
