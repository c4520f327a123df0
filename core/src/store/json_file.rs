// restoration-core/src/store/json_file.rs

use crate::error::StoreError;
use crate::order::{Order, OrderId};
use crate::store::RecordStore;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Keeps each order as `<dir>/<order_id>.json`, pretty-printed.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
  dir: PathBuf,
}

impl JsonFileStore {
  /// Opens the store, creating `dir` if needed.
  pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
    let dir = dir.into();
    tokio::fs::create_dir_all(&dir).await?;
    Ok(Self { dir })
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  fn record_path(&self, order_id: &OrderId) -> PathBuf {
    self.dir.join(format!("{}.json", order_id))
  }
}

#[async_trait]
impl RecordStore for JsonFileStore {
  #[instrument(name = "JsonFileStore::save", skip_all, fields(order_id = %order.order_id()), err)]
  async fn save(&self, order: &Order) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(order)?;
    tokio::fs::write(self.record_path(order.order_id()), bytes).await?;
    debug!("Order record written.");
    Ok(())
  }

  #[instrument(name = "JsonFileStore::load", skip(self), fields(order_id = %order_id), err)]
  async fn load(&self, order_id: &OrderId) -> Result<Option<Order>, StoreError> {
    match tokio::fs::read(self.record_path(order_id)).await {
      Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  async fn list(&self) -> Result<Vec<OrderId>, StoreError> {
    let mut entries = tokio::fs::read_dir(&self.dir).await?;
    let mut ids = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
      let file_name = entry.file_name();
      let Some(stem) = file_name.to_str().and_then(|name| name.strip_suffix(".json")) else {
        continue;
      };
      match OrderId::parse(stem) {
        Ok(id) => ids.push(id),
        Err(e) => warn!(error = %e, "Ignoring foreign file in orders directory."),
      }
    }
    ids.sort();
    Ok(ids)
  }

  async fn exists(&self, order_id: &OrderId) -> Result<bool, StoreError> {
    Ok(tokio::fs::try_exists(self.record_path(order_id)).await?)
  }
}
