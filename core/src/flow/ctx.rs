// restoration-core/src/flow/ctx.rs

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared, lockable state that every step of a workflow run operates on.
///
/// Cloning a `Ctx` clones the handle, not the data: the caller keeps one clone
/// and reads the results back after the run.
///
/// Guards are blocking `parking_lot` guards and must be dropped before any
/// `.await` point inside a handler.
#[derive(Debug)]
pub struct Ctx<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> Ctx<T> {
  pub fn new(data: T) -> Self {
    Ctx(Arc::new(RwLock::new(data)))
  }

  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }
}

impl<T: Send + Sync + 'static> Clone for Ctx<T> {
  fn clone(&self) -> Self {
    Ctx(Arc::clone(&self.0))
  }
}

impl<T: Send + Sync + 'static + Default> Default for Ctx<T> {
  fn default() -> Self {
    Self::new(T::default())
  }
}
