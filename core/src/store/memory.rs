// restoration-core/src/store/memory.rs

use crate::error::StoreError;
use crate::order::{Order, OrderId};
use crate::store::RecordStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// In-process store. Snapshots are kept as encoded JSON so a loaded order never
/// aliases the stored one, matching the file store's copy semantics.
#[derive(Debug, Default)]
pub struct MemoryStore {
  records: Mutex<BTreeMap<OrderId, Vec<u8>>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.records.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.lock().is_empty()
  }
}

#[async_trait]
impl RecordStore for MemoryStore {
  async fn save(&self, order: &Order) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(order)?;
    self.records.lock().insert(order.order_id().clone(), bytes);
    Ok(())
  }

  async fn load(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError> {
    let bytes = self.records.lock().get(order_id).cloned();
    match bytes {
      Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
      None => Ok(None),
    }
  }

  async fn list(&self) -> Result<Vec<OrderId>, StoreError> {
    Ok(self.records.lock().keys().cloned().collect())
  }

  async fn exists(&self, order_id: &OrderId) -> Result<bool, StoreError> {
    Ok(self.records.lock().contains_key(order_id))
  }
}
