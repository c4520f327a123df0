// restoration-core/src/store/mod.rs

//! Persistence of order snapshots, one record per order ID.
//!
//! `save` replaces the previous snapshot wholesale (last write wins); there is
//! no versioning and no protection against a torn write.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::order::{Order, OrderId};
use async_trait::async_trait;

#[async_trait]
pub trait RecordStore: Send + Sync {
  async fn save(&self, order: &Order) -> Result<(), StoreError>;

  /// `Ok(None)` when no record exists for `order_id`.
  async fn load(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError>;

  /// IDs of every persisted order, sorted.
  async fn list(&self) -> Result<Vec<OrderId>, StoreError>;

  async fn exists(&self, order_id: &OrderId) -> Result<bool, StoreError> {
    Ok(self.load(order_id).await?.is_some())
  }
}
