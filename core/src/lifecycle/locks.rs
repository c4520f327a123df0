// restoration-core/src/lifecycle/locks.rs

use crate::order::OrderId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per order ID, so that mutations of the same order within
/// this process run one at a time.
#[derive(Debug, Default)]
pub struct OrderLocks {
  slots: Mutex<HashMap<OrderId, Arc<AsyncMutex<()>>>>,
}

impl OrderLocks {
  pub fn new() -> Self {
    Self::default()
  }

  /// Waits until no other holder of `order_id`'s lock remains.
  pub async fn acquire(&self, order_id: &OrderId) -> OwnedMutexGuard<()> {
    let slot = {
      let mut slots = self.slots.lock();
      // Entries nobody holds or waits on can go.
      slots.retain(|_, slot| Arc::strong_count(slot) > 1);
      slots.entry(order_id.clone()).or_default().clone()
    };
    slot.lock_owned().await
  }

  /// Number of orders with a live lock slot.
  pub fn tracked(&self) -> usize {
    self.slots.lock().len()
  }
}
